// SPDX-License-Identifier: MIT

//! HTTP middleware.

pub mod auth;
pub mod security;
