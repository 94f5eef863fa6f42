use cairo::{Context, Error, TextExtents};

/// A trait to add the `show_text_align` method to the [`Context`] type.
pub trait ShowTextAlign {
    /// Draws the given text at the given `(x, y)` position, with the given alignment.
    ///
    /// By default, text is rendered with the bottom left corner of the text at the given `(x, y)`
    /// point. The alignment is a pair of `(x, y)` values, each between `0.0` and `1.0`, that picks
    /// the point of the text placed at `(x, y)`: `(0.0, 0.0)` is the bottom left corner, `(0.5,
    /// 0.5)` the center, and `(1.0, 1.0)` the top right corner.
    ///
    /// Returns the extents of the drawn text.
    fn show_text_align(
        &self,
        text: &str,
        point: (f64, f64),
        align: (f64, f64),
    ) -> Result<TextExtents, Error>;

    /// Same as [`ShowTextAlign::show_text_align`], but with extents that were already measured.
    fn show_text_align_with_extents(
        &self,
        text: &str,
        point: (f64, f64),
        align: (f64, f64),
        extents: &TextExtents,
    ) -> Result<(), Error>;
}

impl ShowTextAlign for Context {
    fn show_text_align(
        &self,
        text: &str,
        point: (f64, f64),
        align: (f64, f64),
    ) -> Result<TextExtents, Error> {
        let extents = self.text_extents(text)?;
        self.show_text_align_with_extents(text, point, align, &extents)?;
        Ok(extents)
    }

    fn show_text_align_with_extents(
        &self,
        text: &str,
        (x, y): (f64, f64),
        align: (f64, f64),
        extents: &TextExtents,
    ) -> Result<(), Error> {
        let x = x - extents.width() * align.0 - extents.x_bearing();
        let y = y + extents.height() * align.1;
        self.move_to(x, y);
        self.show_text(text)
    }
}
