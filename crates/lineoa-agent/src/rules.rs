// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use lineoa_core::KeywordRule;

/// First active rule, in stored order, with a keyword contained in `text`.
pub fn find_matching_rule<'a>(rules: &'a [KeywordRule], text: &str) -> Option<&'a KeywordRule> {
    rules.iter().find(|rule| rule.is_active && rule.matches(text))
}
