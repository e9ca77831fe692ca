// ABOUTME: Re-exports command modules for storefront-cli
// ABOUTME: Provides access to settings, migration, and key commands
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors

pub mod keys;
pub mod migrate;
pub mod settings;
