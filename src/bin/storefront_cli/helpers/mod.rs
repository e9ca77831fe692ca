// ABOUTME: Helper modules for storefront-cli
// ABOUTME: Output formatting shared by commands
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors

pub mod display;
