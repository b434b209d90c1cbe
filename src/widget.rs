//! The crop widget: options-driven HTML emission plus glue-script
//! registration.
//!
//! A widget goes through two phases:
//!
//! 1. **Construction** ([`CropWidget::new`]) resolves the identity string,
//!    injects the fixed role classes and the per-instance `<id>_<role>`
//!    classes, fills in default labels, and rejects configurations with
//!    missing or empty button labels. Caller-supplied labels and classes are
//!    never overwritten; normalization only fills gaps.
//! 2. **Render** ([`CropWidget::render`]) is a pure function of the
//!    normalized widget: it emits the fragment (container, file input,
//!    hidden crop field, preview pane, controls row) and registers the
//!    plugin asset bundle plus the generated glue script with the [`View`].
//!    Rendering the same widget twice produces byte-identical output.
//!
//! The glue script drives the browser-side plugin through its documented
//! call convention: `cropit(options)` to initialize, `cropit('rotateCW')` /
//! `cropit('rotateCCW')`, and `cropit('export', options)` whose data-URI
//! result is written into the hidden field.

use std::fmt::Write;

use log::debug;
use maud::{Markup, PreEscaped};
use thiserror::Error;

use crate::assets::{self, View};
use crate::html;
use crate::options::{AttrMap, IdentitySource, LabeledOptions, Toggle, WidgetConfig};

/// Fixed class marking the widget container as the crop-tool root.
const CONTAINER_CLASS: &str = "imageCropperInner";
/// Fixed class the plugin expects on the preview pane.
const PREVIEW_CLASS: &str = "cropit-preview";
/// Fixed class the plugin expects on the file input.
const FILE_INPUT_CLASS: &str = "cropit-image-input";
/// Fixed class the plugin expects on the zoom range input.
const ZOOM_SLIDER_CLASS: &str = "cropit-image-zoom-input";
const ZOOM_WRAPPER_CLASS: &str = "controls-zoom";
const ROTATE_WRAPPER_CLASS: &str = "controls-rotate";
const ZOOM_OUT_LABEL_CLASS: &str = "control-zoom-out";
const ZOOM_IN_LABEL_CLASS: &str = "control-zoom-in";

/// Configuration errors: programmer mistakes in the consuming application,
/// fatal before any markup is produced.
#[derive(Error, Debug, PartialEq)]
pub enum WidgetError {
    #[error("button label must be specified for the {role} control")]
    MissingLabel { role: &'static str },
    #[error("widget identity must not be empty")]
    EmptyIdentity,
}

/// One image-cropping form control.
///
/// Holds the normalized configuration; see the module docs for the
/// construction/render split.
#[derive(Debug, Clone)]
pub struct CropWidget {
    identity: String,
    config: WidgetConfig,
}

/// Per-instance CSS class for a control role: `<identity>_<role>`.
pub fn scoped_class(identity: &str, role: &str) -> String {
    format!("{identity}_{role}")
}

impl CropWidget {
    /// Normalize a configuration into a renderable widget.
    ///
    /// The identity comes from `config.identity` when set, otherwise from
    /// `ids`. Fails on an empty identity or a button configured with an
    /// empty label.
    pub fn new(config: WidgetConfig, ids: &mut dyn IdentitySource) -> Result<Self, WidgetError> {
        let identity = match &config.identity {
            Some(identity) => identity.clone(),
            None => ids.next_identity(),
        };
        if identity.is_empty() {
            return Err(WidgetError::EmptyIdentity);
        }

        let mut config = config;
        normalize(&mut config, &identity)?;
        debug!("crop widget {identity} configured");
        Ok(Self { identity, config })
    }

    /// The identity scoping this instance's classes and selectors.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Emit the widget fragment and register assets and script on `view`.
    pub fn render(&self, view: &mut dyn View) -> Markup {
        let container_tag = self.config.container.tag_or("div");

        let fragments = [
            html::begin_tag(container_tag, &self.config.container.attrs),
            self.render_file_input(),
            self.render_hidden_input(),
            self.render_preview(),
            self.render_controls(),
            html::end_tag(container_tag),
        ];

        self.register_assets(view);

        PreEscaped(fragments.join("\n"))
    }

    fn render_file_input(&self) -> String {
        let mut attrs = AttrMap::new();
        attrs.insert(
            "class".to_string(),
            format!(
                "{FILE_INPUT_CLASS} {}",
                scoped_class(&self.identity, "image-input")
            ),
        );
        html::input(
            "file",
            Some(&self.config.binding.file_input_name()),
            None,
            &attrs,
        )
    }

    fn render_hidden_input(&self) -> String {
        let mut attrs = AttrMap::new();
        attrs.insert(
            "class".to_string(),
            scoped_class(&self.identity, "crop-image-data"),
        );
        html::input(
            "hidden",
            Some(&self.config.binding.hidden_input_name()),
            self.config.binding.value(),
            &attrs,
        )
    }

    fn render_preview(&self) -> String {
        html::tag(
            self.config.preview.tag_or("div"),
            "",
            &self.config.preview.attrs,
        )
    }

    /// The controls row: select button, rotate group, zoom group, crop
    /// button, in that fixed order.
    fn render_controls(&self) -> String {
        let mut wrapper_attrs = AttrMap::new();
        wrapper_attrs.insert("class".to_string(), "controls".to_string());

        let mut parts = vec![html::begin_tag("div", &wrapper_attrs)];
        parts.push(render_button(&self.config.select_button));
        if let Some(rotate) = self.render_rotate_controls() {
            parts.push(rotate);
        }
        if let Some(zoom) = self.render_zoom_controls() {
            parts.push(zoom);
        }
        parts.push(render_button(&self.config.crop_button));
        parts.push(html::end_tag("div"));
        parts.join("\n")
    }

    fn render_rotate_controls(&self) -> Option<String> {
        if !self.config.rotate {
            return None;
        }

        let mut parts = Vec::new();
        let wrapper_tag = self
            .config
            .rotate_wrapper
            .as_enabled()
            .map(|wrapper| {
                let tag = wrapper.tag_or("div").to_string();
                parts.push(html::begin_tag(&tag, &wrapper.attrs));
                tag
            });
        parts.push(render_button(&self.config.rotate_left_button));
        parts.push(render_button(&self.config.rotate_right_button));
        if let Some(tag) = wrapper_tag {
            parts.push(html::end_tag(&tag));
        }
        Some(parts.join("\n"))
    }

    /// Disabling the slider suppresses the entire group; disabling only the
    /// wrapper still renders slider and labels, unwrapped.
    fn render_zoom_controls(&self) -> Option<String> {
        let slider = self.config.zoom_slider.as_enabled()?;

        let mut parts = Vec::new();
        let wrapper_tag = self.config.zoom_wrapper.as_enabled().map(|wrapper| {
            let tag = wrapper.tag_or("div").to_string();
            parts.push(html::begin_tag(&tag, &wrapper.attrs));
            tag
        });
        if let Toggle::Enabled(label) = &self.config.zoom_out_label {
            parts.push(render_zoom_label(label));
        }
        parts.push(html::input("range", None, None, &slider.attrs));
        if let Toggle::Enabled(label) = &self.config.zoom_in_label {
            parts.push(render_zoom_label(label));
        }
        if let Some(tag) = wrapper_tag {
            parts.push(html::end_tag(&tag));
        }
        Some(parts.join("\n"))
    }

    fn register_assets(&self, view: &mut dyn View) {
        view.register_asset_bundle(&assets::CROPIT);

        if let Toggle::Enabled(options) = &self.config.plugin_options {
            let js = self.build_script(options);
            debug!("registering glue script for #{}", self.identity);
            view.register_js(&js);
        }
    }

    /// Generated statements, in order: plugin init, select binding, rotate
    /// bindings (when rotation is on), crop/export binding, then any custom
    /// trailing script verbatim.
    fn build_script(&self, plugin_options: &serde_json::Map<String, serde_json::Value>) -> String {
        let id = &self.identity;
        let mut js = String::new();

        let init_options = render_call_options(plugin_options);
        let _ = writeln!(js, "jQuery('#{id}').cropit({init_options});");

        let _ = writeln!(
            js,
            "jQuery('.{select}').on('click', function () {{ jQuery('.{input}').click(); }});",
            select = scoped_class(id, "select-image-btn"),
            input = scoped_class(id, "image-input"),
        );

        if self.config.rotate {
            let _ = writeln!(
                js,
                "jQuery('.{right}').on('click', function () {{ jQuery('#{id}').cropit('rotateCW'); }});",
                right = scoped_class(id, "rotate-right"),
            );
            let _ = writeln!(
                js,
                "jQuery('.{left}').on('click', function () {{ jQuery('#{id}').cropit('rotateCCW'); }});",
                left = scoped_class(id, "rotate-left"),
            );
        }

        let export_options = render_call_options(&self.config.export_options);
        let export_arguments = if export_options.is_empty() {
            "'export'".to_string()
        } else {
            format!("'export', {export_options}")
        };
        let _ = writeln!(
            js,
            "jQuery('.{crop}').on('click', function () {{ var imageData = jQuery('#{id}').cropit({export_arguments}); jQuery('.{data}').val(imageData); }});",
            crop = scoped_class(id, "crop-image-btn"),
            data = scoped_class(id, "crop-image-data"),
        );

        if let Some(extra) = &self.config.extra_script {
            js.push_str(extra);
            if !extra.ends_with('\n') {
                js.push('\n');
            }
        }

        // Trailing newline is an artifact of writeln; the registration joins
        // scripts itself.
        js.truncate(js.trim_end_matches('\n').len());
        js
    }
}

/// Fill defaults and inject classes; every step only fills gaps.
fn normalize(config: &mut WidgetConfig, identity: &str) -> Result<(), WidgetError> {
    config
        .container
        .attrs
        .insert("id".to_string(), identity.to_string());
    html::add_css_class(&mut config.container.attrs, CONTAINER_CLASS);
    html::add_css_class(&mut config.preview.attrs, PREVIEW_CLASS);

    if let Some(wrapper) = config.zoom_wrapper.as_enabled_mut() {
        html::add_css_class(&mut wrapper.attrs, ZOOM_WRAPPER_CLASS);
    }
    if let Some(wrapper) = config.rotate_wrapper.as_enabled_mut() {
        html::add_css_class(&mut wrapper.attrs, ROTATE_WRAPPER_CLASS);
    }

    normalize_button(
        &mut config.select_button,
        identity,
        "select-image-btn",
        "Select image",
    )?;
    normalize_button(
        &mut config.crop_button,
        identity,
        "crop-image-btn",
        "Crop image",
    )?;
    if config.rotate {
        normalize_button(&mut config.rotate_left_button, identity, "rotate-left", "CCW")?;
        normalize_button(
            &mut config.rotate_right_button,
            identity,
            "rotate-right",
            "CW",
        )?;
    }

    if let Some(slider) = config.zoom_slider.as_enabled_mut() {
        html::add_css_class(&mut slider.attrs, ZOOM_SLIDER_CLASS);
        html::add_css_class(&mut slider.attrs, &scoped_class(identity, "zoom-slider"));

        if let Some(label) = config.zoom_out_label.as_enabled_mut() {
            html::add_css_class(&mut label.attrs, ZOOM_OUT_LABEL_CLASS);
            label.label.get_or_insert_with(|| "-".to_string());
        }
        if let Some(label) = config.zoom_in_label.as_enabled_mut() {
            html::add_css_class(&mut label.attrs, ZOOM_IN_LABEL_CLASS);
            label.label.get_or_insert_with(|| "+".to_string());
        }
    }

    Ok(())
}

/// Scope a button to its instance and fill the default label; an explicitly
/// empty label is a configuration error.
fn normalize_button(
    button: &mut LabeledOptions,
    identity: &str,
    role: &'static str,
    default_label: &str,
) -> Result<(), WidgetError> {
    html::add_css_class(&mut button.attrs, &scoped_class(identity, role));
    let label = button
        .label
        .get_or_insert_with(|| default_label.to_string());
    if label.is_empty() {
        return Err(WidgetError::MissingLabel { role });
    }
    Ok(())
}

/// Button markup: labels validated at construction; `<button>` elements get
/// `type="button"` unless the caller set a type, so they never submit the
/// form.
fn render_button(button: &LabeledOptions) -> String {
    let tag = button.tag_or("button");
    let mut attrs = button.attrs.clone();
    if tag == "button" && !attrs.contains_key("type") {
        attrs.insert("type".to_string(), "button".to_string());
    }
    let label = button.label.as_deref().unwrap_or_default();
    let content = if button.encode_label {
        html::escape(label)
    } else {
        label.to_string()
    };
    html::tag(tag, &content, &attrs)
}

fn render_zoom_label(label: &LabeledOptions) -> String {
    let text = label.label.as_deref().unwrap_or_default();
    let content = if label.encode_label {
        html::escape(text)
    } else {
        text.to_string()
    };
    html::tag(label.tag_or("span"), &content, &label.attrs)
}

/// Options for a plugin call: empty map → no argument, mirroring an
/// argument-less `cropit()` init.
fn render_call_options(options: &serde_json::Map<String, serde_json::Value>) -> String {
    if options.is_empty() {
        String::new()
    } else {
        html::json_html_encode(&serde_json::Value::Object(options.clone()))
    }
}
