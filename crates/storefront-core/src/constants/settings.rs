// ABOUTME: Settings keys, key prefixes, and sensitive-field name fragments
// ABOUTME: Shared by the resolver, migrations, and HTTP boundary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Storefront Settings Contributors

/// Fragments that mark a setting key as sensitive (matched without separators)
pub const SENSITIVE_FIELD_FRAGMENTS: &[&str] = &["password", "secret", "token", "apikey", "private"];

/// Prefix of every product card visibility flag
pub const PRODUCT_CARD_PREFIX: &str = "product_card_";

/// Bundle name for product card flags
pub const PRODUCT_CARD_BUNDLE: &str = "product_card";

/// Toggles the storefront checkout
pub const ECOMMERCE_ENABLED: &str = "ecommerce_enabled";

/// Public site name
pub const SITE_NAME: &str = "site_name";

/// Show the brand line on product cards
pub const PRODUCT_CARD_SHOW_BRAND: &str = "product_card_showBrand";
/// Show the origin line on product cards
pub const PRODUCT_CARD_SHOW_ORIGIN: &str = "product_card_showOrigin";
/// Show the category chip on product cards
pub const PRODUCT_CARD_SHOW_CATEGORY: &str = "product_card_showCategory";
/// Show the rating stars on product cards
pub const PRODUCT_CARD_SHOW_RATING: &str = "product_card_showRating";
/// Show the stock badge on product cards
pub const PRODUCT_CARD_SHOW_STOCK_STATUS: &str = "product_card_showStockStatus";
/// Show the price on product cards
pub const PRODUCT_CARD_SHOW_PRICE: &str = "product_card_showPrice";
