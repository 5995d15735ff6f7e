// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Logo resolution for badge rendering.
//!
//! Built-in names map to embedded base64 SVG data URIs, remote and inline
//! references pass through untouched, and anything else renders without a
//! logo. An unrecognized logo is never an error.

const GO_WHITE: &str = "data:image/svg+xml;base64,PHN2ZyB4bWxucz0iaHR0cDovL3d3dy53My5vcmcvMjAwMC9zdmciIHZpZXdCb3g9IjAgMCAyNCAyNCI+PHBhdGggZmlsbD0iI2ZmZmZmZiIgZD0iTTEuOCAxMC4ycy0uMS0uMSAwLS4xbC41LS42LjEtLjFoNy42di4xbC0uNC42LS4xLjF6TS4xIDEyLjFzLS4xIDAgMC0uMWwuNS0uNi4xLS4xaDkuN3YuMWwtLjIuNS0uMS4xem01IDEuOXMtLjEgMCAwLS4xbC4zLS42LjEtLjFoNC4zdi4xbC0uMS41LS4xLjF6TTIyLjQgOS44Yy0xLjQuNC0yLjMuNi0zLjYgMS0uMy4xLS40LjEtLjctLjMtLjQtLjQtLjYtLjctMS4yLTEtMS42LS44LTMuMi0uNi00LjcuNC0xLjggMS4yLTIuNyAyLjktMi43IDUuMSAwIDIuMiAxLjUgMy45IDMuNiA0LjIgMS44LjIgMy4zLS40IDQuNS0xLjhsLjctMWgtNS4xYy0uNiAwLS43LS4zLS41LS44LjQtLjkgMS0yLjQgMS40LTMuMi4xLS4yLjMtLjUuNy0uNWg5LjZjMCAuNyAwIDEuNC0uMSAyLjEtLjMgMS45LTEgMy43LTIuMiA1LjItMS45IDIuNS00LjQgNC4xLTcuNiA0LjUtMi42LjMtNS4xLS4yLTcuMS0xLjgtMS45LTEuNS0zLTMuNC0zLjItNS44LS4zLTIuOC41LTUuNCAyLjItNy42IDEuOC0yLjQgNC4yLTMuOSA3LjItNC40IDIuNC0uNCA0LjctLjEgNi44IDEuMyAxLjMuOSAyLjMgMi4xIDIuOSAzLjYuMS4zIDAgLjQtLjMuNXoiLz48L3N2Zz4=";
const GO_BRAND: &str = "data:image/svg+xml;base64,PHN2ZyB4bWxucz0iaHR0cDovL3d3dy53My5vcmcvMjAwMC9zdmciIHZpZXdCb3g9IjAgMCAyNCAyNCI+PHBhdGggZmlsbD0iIzAwQUREOCIgZD0iTTEuOCAxMC4ycy0uMS0uMSAwLS4xbC41LS42LjEtLjFoNy42di4xbC0uNC42LS4xLjF6TS4xIDEyLjFzLS4xIDAgMC0uMWwuNS0uNi4xLS4xaDkuN3YuMWwtLjIuNS0uMS4xem01IDEuOXMtLjEgMCAwLS4xbC4zLS42LjEtLjFoNC4zdi4xbC0uMS41LS4xLjF6TTIyLjQgOS44Yy0xLjQuNC0yLjMuNi0zLjYgMS0uMy4xLS40LjEtLjctLjMtLjQtLjQtLjYtLjctMS4yLTEtMS42LS44LTMuMi0uNi00LjcuNC0xLjggMS4yLTIuNyAyLjktMi43IDUuMSAwIDIuMiAxLjUgMy45IDMuNiA0LjIgMS44LjIgMy4zLS40IDQuNS0xLjhsLjctMWgtNS4xYy0uNiAwLS43LS4zLS41LS44LjQtLjkgMS0yLjQgMS40LTMuMi4xLS4yLjMtLjUuNy0uNWg5LjZjMCAuNyAwIDEuNC0uMSAyLjEtLjMgMS45LTEgMy43LTIuMiA1LjItMS45IDIuNS00LjQgNC4xLTcuNiA0LjUtMi42LjMtNS4xLS4yLTcuMS0xLjgtMS45LTEuNS0zLTMuNC0zLjItNS44LS4zLTIuOC41LTUuNCAyLjItNy42IDEuOC0yLjQgNC4yLTMuOSA3LjItNC40IDIuNC0uNCA0LjctLjEgNi44IDEuMyAxLjMuOSAyLjMgMi4xIDIuOSAzLjYuMS4zIDAgLjQtLjMuNXoiLz48L3N2Zz4=";
const GITHUB_WHITE: &str = "data:image/svg+xml;base64,PHN2ZyB4bWxucz0iaHR0cDovL3d3dy53My5vcmcvMjAwMC9zdmciIHZpZXdCb3g9IjAgMCAyNCAyNCI+PHBhdGggZmlsbD0iI2ZmZmZmZiIgZD0iTTEyIC4zYTEyIDEyIDAgMCAwLTMuOCAyMy40Yy42LjEuOC0uMy44LS42di0yYy0zLjMuNy00LTEuNi00LTEuNi0uNi0xLjQtMS40LTEuOC0xLjQtMS44LTEtLjcuMS0uNy4xLS43IDEuMi4xIDEuOCAxLjIgMS44IDEuMiAxIDEuOCAyLjggMS4zIDMuNSAxIDAtLjguNC0xLjMuNy0xLjYtMi43LS4zLTUuNS0xLjMtNS41LTYgMC0xLjIuNS0yLjMgMS4zLTMuMS0uMi0uNC0uNi0xLjYgMC0zLjIgMCAwIDEtLjMgMy40IDEuMmExMS41IDExLjUgMCAwIDEgNiAwYzIuMy0xLjUgMy4zLTEuMiAzLjMtMS4yLjYgMS42LjIgMi44LjEgMy4yLjguOCAxLjMgMS45IDEuMyAzLjIgMCA0LjYtMi44IDUuNi01LjUgNS45LjUuNC45IDEgLjkgMi4ydjMuM2MwIC4zLjEuNy44LjZBMTIgMTIgMCAwIDAgMTIgLjMiLz48L3N2Zz4=";
const GITHUB_BRAND: &str = "data:image/svg+xml;base64,PHN2ZyB4bWxucz0iaHR0cDovL3d3dy53My5vcmcvMjAwMC9zdmciIHZpZXdCb3g9IjAgMCAyNCAyNCI+PHBhdGggZmlsbD0iIzE4MTcxNyIgZD0iTTEyIC4zYTEyIDEyIDAgMCAwLTMuOCAyMy40Yy42LjEuOC0uMy44LS42di0yYy0zLjMuNy00LTEuNi00LTEuNi0uNi0xLjQtMS40LTEuOC0xLjQtMS44LTEtLjcuMS0uNy4xLS43IDEuMi4xIDEuOCAxLjIgMS44IDEuMiAxIDEuOCAyLjggMS4zIDMuNSAxIDAtLjguNC0xLjMuNy0xLjYtMi43LS4zLTUuNS0xLjMtNS41LTYgMC0xLjIuNS0yLjMgMS4zLTMuMS0uMi0uNC0uNi0xLjYgMC0zLjIgMCAwIDEtLjMgMy40IDEuMmExMS41IDExLjUgMCAwIDEgNiAwYzIuMy0xLjUgMy4zLTEuMiAzLjMtMS4yLjYgMS42LjIgMi44LjEgMy4yLjguOCAxLjMgMS45IDEuMyAzLjIgMCA0LjYtMi44IDUuNi01LjUgNS45LjUuNC45IDEgLjkgMi4ydjMuM2MwIC4zLjEuNy44LjZBMTIgMTIgMCAwIDAgMTIgLjMiLz48L3N2Zz4=";

/// Resolves a logo reference into the value placed in the `<image>` element.
///
/// `logo_color` only affects built-in logos: white (the default) keeps the
/// white glyph, any other color selects the brand-colored glyph.
///
/// # Examples
///
/// ```
/// use covbadge::resolve_logo;
///
/// assert!(resolve_logo("github", None).is_some_and(|uri| uri.starts_with("data:image/svg+xml;base64,")));
/// assert_eq!(resolve_logo("https://example.com/logo.svg", None).as_deref(), Some("https://example.com/logo.svg"));
/// assert!(resolve_logo("not a logo", None).is_none());
/// ```
pub fn resolve_logo<'a>(logo: &'a str, logo_color: Option<&str>) -> Option<&'a str> {
    let trimmed = logo.trim();
    if trimmed.starts_with("http") || trimmed.starts_with("data:") {
        return Some(trimmed);
    }

    let brand = logo_color.is_some_and(|color| !is_white(color));
    let uri = match (trimmed.to_ascii_lowercase().as_str(), brand) {
        ("go", false) => GO_WHITE,
        ("go", true) => GO_BRAND,
        ("github", false) => GITHUB_WHITE,
        ("github", true) => GITHUB_BRAND,
        _ => return None
    };
    Some(uri)
}

fn is_white(color: &str) -> bool {
    matches!(
        color.trim().to_ascii_lowercase().as_str(),
        "" | "white" | "#fff" | "#ffffff" | "fff" | "ffffff"
    )
}
