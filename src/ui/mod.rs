//! UI components for DocAdjust

pub mod drop_area;
pub mod modify_form;
pub mod overview;
pub mod theme;
