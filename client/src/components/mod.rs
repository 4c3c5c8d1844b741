//! Reusable UI pieces shared by several pages.

pub mod session_bar;
