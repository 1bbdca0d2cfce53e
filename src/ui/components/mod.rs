pub mod assessment_view;
pub mod menu;
pub mod picker;
pub mod workspace_view;
