//! Core types and traits for the formselect dropdown control.
//!
//! This crate provides the framework-independent building blocks the select
//! core is assembled from:
//! - Input events: [`Event`], [`Key`], [`MouseButton`], [`PointerTarget`]
//! - Validity: [`Validator`], [`ValidityState`], [`ValidationEngine`]
//! - Ordered notifications: [`ChangeStream`]
//! - Render batching: [`RenderScheduler`]
//! - Time: [`Clock`], [`SystemClock`], [`ManualClock`]

mod clock;
mod error;
mod event;
mod render;
mod state;
pub mod validation;
mod widget;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Diagnostic, MenuError, SelectionError};
pub use event::{Event, Key, MouseButton, PointerTarget};
pub use render::{RenderPass, RenderScheduler};
pub use state::{Change, ChangeStream, SubscriptionId};
pub use validation::{
    revalidate, Custom, ValidationEngine, ValidationResult, Validator, ValidityReason,
    ValidityState, DEFAULT_VALUE_MISSING_MESSAGE,
};
pub use widget::WidgetId;
