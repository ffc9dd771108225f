// SPDX-FileCopyrightText: 2026 Dialshell Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Dialshell integration tests.

pub mod mock_page;

pub use mock_page::MockPage;
