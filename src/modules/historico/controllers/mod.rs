pub mod history_controller;
