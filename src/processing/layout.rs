//! Letterbox geometry: how big the scaled source is and where it lands.

/// Placement of a source image inside a fixed canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetterboxPlan {
    /// `min(canvas_w / src_w, canvas_h / src_h)`.
    pub scale: f64,
    pub scaled_width: u32,
    pub scaled_height: u32,
    pub offset_x: u32,
    pub offset_y: u32,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

impl LetterboxPlan {
    /// Pixels left uncovered on the (left, right, top, bottom) edges.
    pub fn margins(&self) -> (u32, u32, u32, u32) {
        let right = self.canvas_width - self.scaled_width - self.offset_x;
        let bottom = self.canvas_height - self.scaled_height - self.offset_y;
        (self.offset_x, right, self.offset_y, bottom)
    }
}

/// Fit `src_w`×`src_h` inside `canvas_w`×`canvas_h` without cropping.
///
/// The binding axis is filled exactly; the other axis is floored. Ratios are
/// compared by cross-multiplication so the result does not depend on float
/// rounding. Both scaled dimensions are at least one pixel. All inputs must
/// be non-zero.
pub fn plan_letterbox(src_w: u32, src_h: u32, canvas_w: u32, canvas_h: u32) -> LetterboxPlan {
    debug_assert!(src_w > 0 && src_h > 0 && canvas_w > 0 && canvas_h > 0);
    let (sw, sh) = (u64::from(src_w.max(1)), u64::from(src_h.max(1)));
    let (cw, ch) = (u64::from(canvas_w.max(1)), u64::from(canvas_h.max(1)));

    // cw / sw <= ch / sh  <=>  cw * sh <= ch * sw
    let width_binds = cw * sh <= ch * sw;
    let (scaled_w, scaled_h) = if width_binds {
        (cw, (sh * cw / sw).clamp(1, ch))
    } else {
        ((sw * ch / sh).clamp(1, cw), ch)
    };
    let scale = (cw as f64 / sw as f64).min(ch as f64 / sh as f64);

    let scaled_width = scaled_w as u32;
    let scaled_height = scaled_h as u32;
    let (offset_x, offset_y) = center_offset(scaled_width, scaled_height, canvas_w, canvas_h);

    LetterboxPlan {
        scale,
        scaled_width,
        scaled_height,
        offset_x,
        offset_y,
        canvas_width: canvas_w,
        canvas_height: canvas_h,
    }
}

pub fn center_offset(inner_w: u32, inner_h: u32, outer_w: u32, outer_h: u32) -> (u32, u32) {
    let ox = outer_w.saturating_sub(inner_w) / 2;
    let oy = outer_h.saturating_sub(inner_h) / 2;
    (ox, oy)
}
