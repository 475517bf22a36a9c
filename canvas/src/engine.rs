//! The drawing surface wrapper.
//!
//! [`Canvas`] owns a base [`Surface`], the layers stacked above it, the list
//! of shapes drawn so far and the sketch capture state. Every drawing call
//! targets the current layer, or the base surface when no layer has been
//! created. Sketch markers always land on the base surface.
//!
//! Validation happens before any surface call: an unknown shape kind, bad
//! options, a bad color or an unknown filter name returns an error with the
//! surface and the shape list exactly as they were.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use tracing::{debug, info};

use crate::color::parse_color;
use crate::consts::{SKETCH_MARKER_COLOR, SKETCH_MARKER_RADIUS};
use crate::error::CanvasError;
use crate::filter::Filter;
use crate::image;
use crate::pixels::PixelBuffer;
use crate::raster::Raster;
use crate::shape::Shape;
use crate::sketch::{FixedRecognizer, Point, Recognizer, SketchCapture};
use crate::surface::{Surface, TextOptions};

/// A named surface stacked above the base.
#[derive(Debug)]
pub struct Layer<S> {
    name: String,
    surface: S,
}

impl<S> Layer<S> {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }
}

/// Drawing surface wrapper over an injected [`Surface`].
pub struct Canvas<S: Surface> {
    base: S,
    layers: Vec<Layer<S>>,
    /// Index into `layers`; `None` draws on `base`.
    current: Option<usize>,
    shapes: Vec<Shape>,
    sketch: SketchCapture,
    recognizer: Box<dyn Recognizer>,
}

impl<S: Surface> Canvas<S> {
    /// Wrap `base`. Sketches are recognized by [`FixedRecognizer`].
    #[must_use]
    pub fn new(base: S) -> Self {
        Self {
            base,
            layers: Vec::new(),
            current: None,
            shapes: Vec::new(),
            sketch: SketchCapture::new(),
            recognizer: Box::new(FixedRecognizer),
        }
    }

    /// Replace the sketch recognizer.
    #[must_use]
    pub fn with_recognizer(mut self, recognizer: impl Recognizer + 'static) -> Self {
        self.recognizer = Box::new(recognizer);
        self
    }

    // --- Dimensions ---

    #[must_use]
    pub fn width(&self) -> u32 {
        self.base.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.base.height()
    }

    /// Resize the base surface. Its contents are cleared; existing layers keep
    /// their size, layers created afterwards use the new one.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the surface rejects the resize.
    pub fn set_dimensions(&mut self, width: u32, height: u32) -> Result<(), CanvasError> {
        self.base.resize(width, height)?;
        debug!(width, height, "canvas resized");
        Ok(())
    }

    // --- Layers ---

    /// Create a layer above all existing ones and make it current.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::DuplicateLayer`] if the name is taken, or any
    /// error from the surface.
    pub fn create_layer(&mut self, name: &str) -> Result<(), CanvasError> {
        if self.layers.iter().any(|l| l.name == name) {
            return Err(CanvasError::DuplicateLayer(name.to_owned()));
        }
        let surface = self.base.create_layer(name)?;
        self.layers.push(Layer { name: name.to_owned(), surface });
        self.current = Some(self.layers.len() - 1);
        info!(layer = name, count = self.layers.len(), "layer created");
        Ok(())
    }

    /// Make the named layer current.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::UnknownLayer`] if no layer has that name.
    pub fn switch_layer(&mut self, name: &str) -> Result<(), CanvasError> {
        let Some(index) = self.layers.iter().position(|l| l.name == name) else {
            return Err(CanvasError::UnknownLayer(name.to_owned()));
        };
        self.current = Some(index);
        debug!(layer = name, "layer switched");
        Ok(())
    }

    /// Draw on the base surface again.
    pub fn switch_to_base(&mut self) {
        self.current = None;
    }

    /// Layer names, bottom to top.
    #[must_use]
    pub fn layer_names(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.name.as_str()).collect()
    }

    /// Name of the current layer, or `None` when drawing on the base.
    #[must_use]
    pub fn current_layer(&self) -> Option<&str> {
        self.current.and_then(|i| self.layers.get(i)).map(|l| l.name.as_str())
    }

    #[must_use]
    pub fn layer(&self, name: &str) -> Option<&S> {
        self.layers.iter().find(|l| l.name == name).map(|l| &l.surface)
    }

    #[must_use]
    pub fn layers(&self) -> &[Layer<S>] {
        &self.layers
    }

    #[must_use]
    pub fn base(&self) -> &S {
        &self.base
    }

    /// The surface drawing calls currently go to.
    #[must_use]
    pub fn target(&self) -> &S {
        match self.current.and_then(|i| self.layers.get(i)) {
            Some(layer) => &layer.surface,
            None => &self.base,
        }
    }

    fn target_mut(&mut self) -> &mut S {
        match self.current.and_then(|i| self.layers.get_mut(i)) {
            Some(layer) => &mut layer.surface,
            None => &mut self.base,
        }
    }

    // --- Shapes ---

    /// Parse `options` for `kind`, draw it, and record it.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::UnknownShape`], [`CanvasError::InvalidShape`],
    /// [`CanvasError::InvalidColor`] or a surface error. Nothing is recorded
    /// on error.
    pub fn add_shape(&mut self, kind: &str, options: serde_json::Value) -> Result<(), CanvasError> {
        let shape = Shape::from_options(kind, options)?;
        self.add(shape)
    }

    /// Draw an already-built shape and record it.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidColor`] or a surface error. Nothing is
    /// recorded on error.
    pub fn add(&mut self, shape: Shape) -> Result<(), CanvasError> {
        shape.render(self.target_mut())?;
        debug!(kind = %shape.kind(), total = self.shapes.len() + 1, "shape added");
        self.shapes.push(shape);
        Ok(())
    }

    /// Shapes drawn since the last clear, in insertion order.
    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    // --- Text, fills and images ---

    /// Draw `text` anchored at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidColor`] or a surface error.
    pub fn add_text(&mut self, text: &str, x: f64, y: f64, options: &TextOptions) -> Result<(), CanvasError> {
        let style = options.resolve()?;
        self.target_mut().fill_text(text, x, y, &style)
    }

    /// Fill the whole current surface with `color`.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidColor`] or a surface error.
    pub fn set_background_color(&mut self, color: &str) -> Result<(), CanvasError> {
        let color = parse_color(color)?;
        let (w, h) = (f64::from(self.width()), f64::from(self.height()));
        self.target_mut().fill_rect(0.0, 0.0, w, h, color)
    }

    /// Draw a decoded image scaled into `(x, y, width, height)`.
    ///
    /// The image is already decoded, so the draw cannot run ahead of the data.
    ///
    /// # Errors
    ///
    /// Returns a surface error.
    pub fn draw_image(&mut self, image: &PixelBuffer, x: f64, y: f64, width: f64, height: f64) -> Result<(), CanvasError> {
        self.target_mut().draw_image(image, x, y, width, height)
    }

    /// Decode `source` (PNG bytes or a PNG data URL), then draw it.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::ImageDecode`] before touching the surface if
    /// the source does not decode, or a surface error.
    pub fn draw_image_source(&mut self, source: &[u8], x: f64, y: f64, width: f64, height: f64) -> Result<(), CanvasError> {
        let image = image::load(source)?;
        self.draw_image(&image, x, y, width, height)
    }

    // --- Clearing and export ---

    /// Clear the base surface and forget all recorded shapes.
    ///
    /// # Errors
    ///
    /// Returns a surface error.
    pub fn clear_canvas(&mut self) -> Result<(), CanvasError> {
        let (w, h) = (f64::from(self.width()), f64::from(self.height()));
        self.base.clear_rect(0.0, 0.0, w, h)?;
        self.shapes.clear();
        debug!("canvas cleared");
        Ok(())
    }

    /// The base surface as a `data:image/png;base64,...` URL.
    ///
    /// # Errors
    ///
    /// Returns a surface or encoding error.
    pub fn save_as_image(&self) -> Result<String, CanvasError> {
        let pixels = self.base.read_pixels()?;
        image::to_data_url(&pixels)
    }

    /// The base surface with every layer composited over it (source-over),
    /// bottom to top. Layers are drawn at their own size from the top-left.
    ///
    /// # Errors
    ///
    /// Returns a surface error.
    pub fn flatten(&self) -> Result<PixelBuffer, CanvasError> {
        let mut out = Raster::from_pixels(&self.base.read_pixels()?);
        for layer in &self.layers {
            let (w, h) = (f64::from(layer.surface.width()), f64::from(layer.surface.height()));
            out.draw_image(&layer.surface.read_pixels()?, 0.0, 0.0, w, h)?;
        }
        Ok(out.pixels())
    }

    /// [`Canvas::flatten`] as a `data:image/png;base64,...` URL.
    ///
    /// # Errors
    ///
    /// Returns a surface or encoding error.
    pub fn save_flattened_image(&self) -> Result<String, CanvasError> {
        image::to_data_url(&self.flatten()?)
    }

    // --- Filters ---

    /// Apply the named filter to the whole current surface.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::UnknownFilter`] before any pixel is read, or a
    /// surface error.
    pub fn apply_filter(&mut self, name: &str) -> Result<(), CanvasError> {
        let filter: Filter = name.parse()?;
        self.apply(filter)
    }

    /// Apply `filter` to the whole current surface.
    ///
    /// # Errors
    ///
    /// Returns a surface error.
    pub fn apply(&mut self, filter: Filter) -> Result<(), CanvasError> {
        let target = self.target_mut();
        let pixels = target.read_pixels()?;
        let filtered = filter.apply(&pixels);
        target.write_pixels(&filtered)?;
        debug!(%filter, "filter applied");
        Ok(())
    }

    // --- Sketching ---

    /// Begin capturing pointer-down events. Any previous points are dropped.
    pub fn start_sketching(&mut self) {
        self.sketch.start();
        info!("sketch capture started");
    }

    /// Feed a pointer-down at `(x, y)`.
    ///
    /// While capturing, the point is recorded and a small gray marker is
    /// drawn on the base surface. Returns whether the point was recorded.
    ///
    /// # Errors
    ///
    /// Returns a surface error from drawing the marker.
    pub fn pointer_down(&mut self, x: f64, y: f64) -> Result<bool, CanvasError> {
        if !self.sketch.is_capturing() {
            return Ok(false);
        }
        let marker = parse_color(SKETCH_MARKER_COLOR)?;
        self.base.fill_circle(x, y, SKETCH_MARKER_RADIUS, marker)?;
        Ok(self.sketch.record(Point::new(x, y)))
    }

    /// Stop capturing and add the recognized shape.
    ///
    /// Returns the shape that was added, or `None` if no capture was running.
    ///
    /// # Errors
    ///
    /// Returns an error if the recognized shape cannot be drawn.
    pub fn stop_sketching(&mut self) -> Result<Option<Shape>, CanvasError> {
        if !self.sketch.finish() {
            return Ok(None);
        }
        let shape = self.recognizer.recognize(self.sketch.points());
        info!(points = self.sketch.points().len(), kind = %shape.kind(), "sketch recognized");
        self.add(shape.clone())?;
        Ok(Some(shape))
    }

    #[must_use]
    pub fn is_sketching(&self) -> bool {
        self.sketch.is_capturing()
    }

    /// Points captured by the current or most recent sketch.
    #[must_use]
    pub fn sketch_points(&self) -> &[Point] {
        self.sketch.points()
    }
}
