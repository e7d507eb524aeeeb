pub mod app;
pub mod normalization;
