pub mod apply_alpha_mask;
pub mod circular_crop;
pub mod ellipse_mask;
pub mod fit;
