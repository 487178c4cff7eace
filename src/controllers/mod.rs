pub mod project_controller;
