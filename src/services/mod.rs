// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod accounts;
pub mod catalog;
pub mod password;
pub mod recommendation;

pub use accounts::{AccountService, NewAccount, Session};
pub use catalog::ProfileQuery;
pub use recommendation::{RecommendationTable, Undertone};
