//! Asset-bundle manifests and page-level registration.
//!
//! [`AssetBundle`] is a static manifest: where a third-party script
//! distribution lives, which files to load, and which bundles must load
//! first. The crop plugin ships as [`CROPIT`], depending on [`JQUERY`].
//!
//! [`View`] is the registration seam the widget renders against. The
//! bundled [`Page`] implementation collects bundles dependency-first with
//! name deduplication and accumulates inline scripts in registration order,
//! then renders everything as `<script>` tags for the end of a page body.

use std::collections::BTreeSet;

use log::debug;
use maud::{Markup, PreEscaped, html};

/// Static manifest for one script distribution.
#[derive(Debug)]
pub struct AssetBundle {
    /// Unique bundle name, used for registration deduplication.
    pub name: &'static str,
    /// Directory the script files are served from.
    pub source_path: &'static str,
    /// Script files in this bundle, relative to `source_path`.
    pub js: &'static [&'static str],
    /// Bundles that must be registered before this one.
    pub depends: &'static [&'static AssetBundle],
}

/// The general-purpose JS utility library the plugin builds on.
pub static JQUERY: AssetBundle = AssetBundle {
    name: "jquery",
    source_path: "vendor/jquery/dist",
    js: &["jquery.min.js"],
    depends: &[],
};

/// The browser-side cropping plugin distribution.
pub static CROPIT: AssetBundle = AssetBundle {
    name: "cropit",
    source_path: "vendor/cropit/dist",
    js: &["jquery.cropit.js"],
    depends: &[&JQUERY],
};

/// Page-level registration facility widgets render against.
pub trait View {
    /// Register a bundle, resolving its dependencies first. Registering the
    /// same bundle twice is a no-op.
    fn register_asset_bundle(&mut self, bundle: &'static AssetBundle);

    /// Queue an inline script block for the end of the page.
    fn register_js(&mut self, js: &str);
}

/// Collects registered bundles and scripts for one rendered page.
#[derive(Debug, Default)]
pub struct Page {
    bundles: Vec<&'static AssetBundle>,
    seen: BTreeSet<&'static str>,
    scripts: Vec<String>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered bundles, dependencies first.
    pub fn bundles(&self) -> &[&'static AssetBundle] {
        &self.bundles
    }

    /// Inline scripts in registration order.
    pub fn scripts(&self) -> &[String] {
        &self.scripts
    }

    /// Render `<script src>` tags for every bundle file, followed by one
    /// inline block running the accumulated scripts on document ready.
    pub fn script_tags(&self) -> Markup {
        html! {
            @for bundle in &self.bundles {
                @for file in bundle.js {
                    script src={ (bundle.source_path) "/" (file) } {}
                }
            }
            @if !self.scripts.is_empty() {
                script {
                    (PreEscaped(format!(
                        "jQuery(function () {{\n{}\n}});",
                        self.scripts.join("\n")
                    )))
                }
            }
        }
    }
}

impl View for Page {
    fn register_asset_bundle(&mut self, bundle: &'static AssetBundle) {
        if self.seen.contains(bundle.name) {
            return;
        }
        for dependency in bundle.depends {
            self.register_asset_bundle(dependency);
        }
        debug!("registered asset bundle {}", bundle.name);
        self.seen.insert(bundle.name);
        self.bundles.push(bundle);
    }

    fn register_js(&mut self, js: &str) {
        self.scripts.push(js.to_string());
    }
}
