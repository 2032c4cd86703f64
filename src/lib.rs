//! Recipe search, bookmarks and uploads on top of the forkify recipe API.
//!
//! [`model::RecipeStore`] owns the application state. Views in [`views`]
//! render snapshots of it into [`dom::Tree`] containers, either from scratch
//! or incrementally through [`reconciler`].

pub mod config;
pub mod controller;
pub mod data_models;
pub mod dom;
pub mod error;
pub mod model;
pub mod reconciler;
pub mod remote;
pub mod storage;
pub mod upload;
pub mod views;
