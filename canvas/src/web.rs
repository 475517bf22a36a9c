//! Browser surface backed by an `HtmlCanvasElement`.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! Every fallible 2D-context call is mapped to [`CanvasError::Surface`] with
//! the JavaScript error rendered as text.
//!
//! Layers are fresh `<canvas>` elements of the base's size, absolutely
//! positioned at the top-left of the page and appended to `<body>`, with the
//! layer name as the element id.

use std::f64::consts::PI;

use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, ImageData};

use crate::color::Rgba;
use crate::error::CanvasError;
use crate::pixels::PixelBuffer;
use crate::raster::Raster;
use crate::surface::{Surface, TextStyle};

/// A 2D context together with the element it draws into.
#[derive(Debug, Clone)]
pub struct WebSurface {
    element: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

fn js_err(value: JsValue) -> CanvasError {
    CanvasError::Surface(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

fn document() -> Result<Document, CanvasError> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| CanvasError::Surface("no document available".to_owned()))
}

impl WebSurface {
    /// Wrap an existing canvas element.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Surface`] if the element has no 2D context.
    pub fn new(element: HtmlCanvasElement) -> Result<Self, CanvasError> {
        let ctx = element
            .get_context("2d")
            .map_err(js_err)?
            .ok_or_else(|| CanvasError::Surface("2d context unavailable".to_owned()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| CanvasError::Surface("context is not a CanvasRenderingContext2d".to_owned()))?;
        Ok(Self { element, ctx })
    }

    /// Look up a `<canvas>` by element id.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Surface`] if no canvas has that id.
    pub fn from_element_id(id: &str) -> Result<Self, CanvasError> {
        let element = document()?
            .get_element_by_id(id)
            .ok_or_else(|| CanvasError::Surface(format!("no element with id {id}")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| CanvasError::Surface(format!("element {id} is not a canvas")))?;
        Self::new(element)
    }

    #[must_use]
    pub fn element(&self) -> &HtmlCanvasElement {
        &self.element
    }

    /// `canvas.toDataURL()` straight from the browser.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Surface`] if the canvas is tainted.
    pub fn to_data_url(&self) -> Result<String, CanvasError> {
        self.element.to_data_url().map_err(js_err)
    }

    fn image_data(&self, pixels: &PixelBuffer) -> Result<ImageData, CanvasError> {
        ImageData::new_with_u8_clamped_array_and_sh(Clamped(pixels.data()), pixels.width(), pixels.height())
            .map_err(js_err)
    }
}

impl Surface for WebSurface {
    fn width(&self) -> u32 {
        self.element.width()
    }

    fn height(&self) -> u32 {
        self.element.height()
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), CanvasError> {
        self.element.set_width(width);
        self.element.set_height(height);
        Ok(())
    }

    fn create_layer(&self, name: &str) -> Result<Self, CanvasError> {
        let document = document()?;
        let element = document
            .create_element("canvas")
            .map_err(js_err)?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| CanvasError::Surface("created element is not a canvas".to_owned()))?;
        element.set_width(self.width());
        element.set_height(self.height());
        element.set_id(name);

        let style = element.style();
        style.set_property("position", "absolute").map_err(js_err)?;
        style.set_property("top", "0").map_err(js_err)?;
        style.set_property("left", "0").map_err(js_err)?;

        let body = document
            .body()
            .ok_or_else(|| CanvasError::Surface("document has no body".to_owned()))?;
        body.append_child(&element).map_err(js_err)?;
        Self::new(element)
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgba) -> Result<(), CanvasError> {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(x, y, width, height);
        Ok(())
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<(), CanvasError> {
        self.ctx.clear_rect(x, y, width, height);
        Ok(())
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Rgba) -> Result<(), CanvasError> {
        self.ctx.begin_path();
        self.ctx.arc(cx, cy, radius, 0.0, 2.0 * PI).map_err(js_err)?;
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill();
        Ok(())
    }

    fn stroke_line(
        &mut self,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        line_width: f64,
        color: Rgba,
    ) -> Result<(), CanvasError> {
        self.ctx.begin_path();
        self.ctx.move_to(x0, y0);
        self.ctx.line_to(x1, y1);
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(line_width);
        self.ctx.stroke();
        Ok(())
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle) -> Result<(), CanvasError> {
        self.ctx.set_font(&style.font);
        self.ctx.set_fill_style_str(&style.color.to_css());
        self.ctx.set_text_align(style.align.as_str());
        self.ctx.fill_text(text, x, y).map_err(js_err)
    }

    // putImageData ignores compositing, so the blit happens on a software copy.
    fn draw_image(&mut self, image: &PixelBuffer, x: f64, y: f64, width: f64, height: f64) -> Result<(), CanvasError> {
        let mut scratch = Raster::from_pixels(&self.read_pixels()?);
        scratch.draw_image(image, x, y, width, height)?;
        self.write_pixels(&scratch.pixels())
    }

    fn read_pixels(&self) -> Result<PixelBuffer, CanvasError> {
        let (w, h) = (self.width(), self.height());
        let data = self
            .ctx
            .get_image_data(0.0, 0.0, f64::from(w), f64::from(h))
            .map_err(js_err)?;
        PixelBuffer::from_rgba(w, h, data.data().0)
    }

    fn write_pixels(&mut self, pixels: &PixelBuffer) -> Result<(), CanvasError> {
        if pixels.width() != self.width() || pixels.height() != self.height() {
            return Err(CanvasError::DimensionMismatch {
                expected_width: self.width(),
                expected_height: self.height(),
                width: pixels.width(),
                height: pixels.height(),
            });
        }
        let data = self.image_data(pixels)?;
        self.ctx.put_image_data(&data, 0.0, 0.0).map_err(js_err)
    }
}
