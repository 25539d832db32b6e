//! Host boundary.
//!
//! The host (page script, windowing shell, test) feeds [`PlatformEvent`]s into
//! the showcase and receives [`PageSignal`]s back over a channel. With the
//! `winit` feature, [`winit_adapter`] translates window events.

/// An input from the host environment.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformEvent {
    /// Pointer position in window pixels, with the window's current size.
    PointerMoved {
        x: f32,
        y: f32,
        viewport_w: f32,
        viewport_h: f32,
    },
    HeroResized { width: u32, height: u32 },
    DetailResized { width: u32, height: u32 },
    PixelRatioChanged { ratio: f32 },
    /// Visible fraction of the product section marker.
    Intersection { ratio: f32 },
    SelectProduct { id: String },
}

/// Page-level effects emitted by the showcase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSignal {
    /// Every tracked asset load has settled. Sent once.
    LoadingComplete,
    RevealIntro,
    RevealHeader,
    /// A product was selected; `content` is the text the page shows for it.
    ProductActivated { id: String, content: String },
}

#[cfg(feature = "winit")]
pub mod winit_adapter {
    use winit::dpi::PhysicalSize;
    use winit::event::WindowEvent;

    use super::PlatformEvent;

    /// Translates a window event of the hero window.
    ///
    /// `inner_size` is the window's current inner size, used to normalize
    /// pointer positions.
    #[must_use]
    pub fn translate_window_event(
        event: &WindowEvent,
        inner_size: PhysicalSize<u32>,
    ) -> Option<PlatformEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => Some(PlatformEvent::PointerMoved {
                x: position.x as f32,
                y: position.y as f32,
                viewport_w: inner_size.width as f32,
                viewport_h: inner_size.height as f32,
            }),
            WindowEvent::Resized(size) => Some(PlatformEvent::HeroResized {
                width: size.width,
                height: size.height,
            }),
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                Some(PlatformEvent::PixelRatioChanged {
                    ratio: *scale_factor as f32,
                })
            }
            _ => None,
        }
    }
}
