use super::encoding::decode_data_url;
use super::surface::{DrawingSurface, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadState {
    Idle,
    Drawing,
}

/// On-screen offset of the surface, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceBounds {
    pub left: f32,
    pub top: f32,
}

/// Raw input events, positions in client (viewport) coordinates.
///
/// Touch positions are `None` when the event carried no touch points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    MouseDown(Point),
    MouseMove(Point),
    MouseUp,
    MouseLeave,
    TouchStart(Option<Point>),
    TouchMove(Option<Point>),
    TouchEnd,
}

/// What the event source should do after dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventOutcome {
    /// Suppress the default action (page scrolling during a touch stroke).
    pub prevent_default: bool,
}

type ChangeCallback = Box<dyn FnMut(&str)>;

/// Signature capture state machine.
///
/// Emits the serialized image through the change callback when a stroke
/// completes and an empty string when cleared. Until a surface is mounted
/// every event is ignored.
pub struct SignaturePad<S> {
    surface: Option<S>,
    bounds: SurfaceBounds,
    state: PadState,
    has_content: bool,
    value: String,
    on_change: Option<ChangeCallback>,
}

impl<S: DrawingSurface> Default for SignaturePad<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: DrawingSurface> SignaturePad<S> {
    pub fn new() -> Self {
        Self {
            surface: None,
            bounds: SurfaceBounds::default(),
            state: PadState::Idle,
            has_content: false,
            value: String::new(),
            on_change: None,
        }
    }

    /// A pad pre-populated with a previously emitted image. The image is
    /// drawn when a surface is mounted.
    pub fn with_value(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            has_content: !value.is_empty(),
            value,
            ..Self::new()
        }
    }

    pub fn on_change(mut self, callback: impl FnMut(&str) + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    /// Attach the drawing surface. A pre-populated value is rendered right
    /// away; one that cannot be decoded leaves the surface blank and the
    /// placeholder showing.
    pub fn mount(&mut self, mut surface: S, bounds: SurfaceBounds) {
        surface.clear();
        if !self.value.is_empty() {
            match decode_data_url(&self.value) {
                Ok(image) => surface.draw_image(&image),
                Err(e) => {
                    log::debug!("Initial signature not drawable: {e}");
                    self.has_content = false;
                }
            }
        }
        self.surface = Some(surface);
        self.bounds = bounds;
        self.state = PadState::Idle;
    }

    /// Detach and return the surface. Pending strokes are dropped.
    pub fn unmount(&mut self) -> Option<S> {
        self.state = PadState::Idle;
        self.surface.take()
    }

    /// The surface moved on screen.
    pub fn set_bounds(&mut self, bounds: SurfaceBounds) {
        self.bounds = bounds;
    }

    pub fn state(&self) -> PadState {
        self.state
    }

    /// Whether the placeholder prompt should be hidden.
    pub fn has_content(&self) -> bool {
        self.has_content
    }

    /// Last emitted (or pre-populated) serialized image.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    /// Serialize what is currently on the surface, without emitting.
    pub fn snapshot(&self) -> Option<String> {
        let surface = self.surface.as_ref()?;
        match surface.encode() {
            Ok(encoded) => Some(encoded),
            Err(e) => {
                log::warn!("Failed to encode signature surface: {e}");
                None
            }
        }
    }

    pub fn handle(&mut self, event: PointerEvent) -> EventOutcome {
        match event {
            PointerEvent::MouseDown(p) | PointerEvent::TouchStart(Some(p)) => {
                self.pointer_down(p);
                EventOutcome::default()
            }
            PointerEvent::MouseMove(p) => {
                self.pointer_move(p);
                EventOutcome::default()
            }
            PointerEvent::TouchMove(p) => {
                let prevent_default = self.state == PadState::Drawing;
                if let Some(p) = p {
                    self.pointer_move(p);
                }
                EventOutcome { prevent_default }
            }
            PointerEvent::MouseUp | PointerEvent::MouseLeave | PointerEvent::TouchEnd => {
                self.pointer_up();
                EventOutcome::default()
            }
            PointerEvent::TouchStart(None) => EventOutcome::default(),
        }
    }

    pub fn pointer_down(&mut self, client: Point) {
        let local = self.to_local(client);
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        surface.begin_path(local);
        self.state = PadState::Drawing;
        self.has_content = true;
    }

    pub fn pointer_move(&mut self, client: Point) {
        if self.state != PadState::Drawing {
            return;
        }
        let local = self.to_local(client);
        if let Some(surface) = self.surface.as_mut() {
            surface.line_to(local);
        }
    }

    /// Finish the stroke and emit the image. Ignored while idle.
    pub fn pointer_up(&mut self) {
        if self.state != PadState::Drawing {
            return;
        }
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        surface.close_path();
        self.state = PadState::Idle;
        match surface.encode() {
            Ok(encoded) => {
                self.value = encoded;
                self.emit();
            }
            Err(e) => log::warn!("Failed to encode signature surface: {e}"),
        }
    }

    pub fn clear(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            surface.clear();
        }
        self.state = PadState::Idle;
        self.has_content = false;
        self.value.clear();
        self.emit();
    }

    fn to_local(&self, client: Point) -> Point {
        Point::new(client.x - self.bounds.left, client.y - self.bounds.top)
    }

    fn emit(&mut self) {
        if let Some(callback) = self.on_change.as_mut() {
            callback(&self.value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::RasterSurface;

    fn mounted() -> SignaturePad<RasterSurface> {
        let mut pad = SignaturePad::new();
        pad.mount(RasterSurface::new(100.0, 50.0, 1.0), SurfaceBounds::default());
        pad
    }

    #[test]
    fn down_enters_drawing() {
        let mut pad = mounted();
        pad.handle(PointerEvent::MouseDown(Point::new(5.0, 5.0)));
        assert_eq!(pad.state(), PadState::Drawing);
        assert!(pad.has_content());
        assert!(pad.value().is_empty(), "nothing is emitted until the stroke ends");
    }

    #[test]
    fn move_while_idle_is_ignored() {
        let mut pad = mounted();
        pad.handle(PointerEvent::MouseMove(Point::new(5.0, 5.0)));
        assert_eq!(pad.state(), PadState::Idle);
        assert!(pad.surface().unwrap().is_blank());
    }

    #[test]
    fn up_while_idle_emits_nothing() {
        let mut pad = mounted();
        pad.handle(PointerEvent::MouseUp);
        assert!(pad.value().is_empty());
    }

    #[test]
    fn touch_move_prevents_scroll_only_while_drawing() {
        let mut pad = mounted();
        let idle = pad.handle(PointerEvent::TouchMove(Some(Point::new(1.0, 1.0))));
        assert!(!idle.prevent_default);

        pad.handle(PointerEvent::TouchStart(Some(Point::new(1.0, 1.0))));
        let drawing = pad.handle(PointerEvent::TouchMove(Some(Point::new(9.0, 9.0))));
        assert!(drawing.prevent_default);
    }

    #[test]
    fn touch_start_without_points_is_ignored() {
        let mut pad = mounted();
        pad.handle(PointerEvent::TouchStart(None));
        assert_eq!(pad.state(), PadState::Idle);
        assert!(!pad.has_content());
    }

    #[test]
    fn positions_are_offset_by_bounds() {
        let mut pad = SignaturePad::new();
        pad.mount(
            RasterSurface::new(20.0, 20.0, 1.0),
            SurfaceBounds { left: 100.0, top: 200.0 },
        );
        pad.handle(PointerEvent::MouseDown(Point::new(110.0, 210.0)));
        pad.handle(PointerEvent::MouseUp);
        let raster = pad.surface().unwrap().raster();
        assert_eq!(raster.get_pixel(10, 10).0[3], 255);
        assert_eq!(raster.get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn unmounted_pad_is_silent() {
        let mut pad: SignaturePad<RasterSurface> = SignaturePad::new();
        pad.handle(PointerEvent::MouseDown(Point::new(1.0, 1.0)));
        pad.handle(PointerEvent::MouseUp);
        assert_eq!(pad.state(), PadState::Idle);
        assert!(!pad.has_content());
        assert!(pad.snapshot().is_none());
    }
}
