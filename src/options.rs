//! Widget configuration types.
//!
//! These structs describe *what* to render, not *how* to render it. Instead
//! of one generic attribute map with reserved keys, each rendered element
//! gets named fields for the parts that control rendering (`tag`, `label`,
//! `encode_label`) plus an open [`AttrMap`] for everything emitted verbatim
//! as HTML attributes. Controls that can be switched off entirely use
//! [`Toggle`] rather than a sentinel value.
//!
//! All types deserialize sparsely: a config document only names the values it
//! overrides, and unknown keys are rejected to catch typos early. On the
//! serialized surface `Toggle::Disabled` is the literal `false`, so disabling
//! a control group in a JSON config reads the same way it does in code.

use std::collections::BTreeMap;

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

use crate::form::FormModel;

/// Open HTML attribute mapping (attribute name → value).
///
/// Sorted map, so attribute emission order is deterministic.
pub type AttrMap = BTreeMap<String, String>;

/// A control that is either rendered with options or switched off.
#[derive(Debug, Clone, PartialEq)]
pub enum Toggle<T> {
    Enabled(T),
    Disabled,
}

impl<T> Toggle<T> {
    pub fn is_enabled(&self) -> bool {
        matches!(self, Toggle::Enabled(_))
    }

    pub fn as_enabled(&self) -> Option<&T> {
        match self {
            Toggle::Enabled(value) => Some(value),
            Toggle::Disabled => None,
        }
    }

    pub fn as_enabled_mut(&mut self) -> Option<&mut T> {
        match self {
            Toggle::Enabled(value) => Some(value),
            Toggle::Disabled => None,
        }
    }
}

impl<T: Default> Default for Toggle<T> {
    fn default() -> Self {
        Toggle::Enabled(T::default())
    }
}

impl<T: Serialize> Serialize for Toggle<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Toggle::Enabled(value) => value.serialize(serializer),
            Toggle::Disabled => serializer.serialize_bool(false),
        }
    }
}

impl<'de, T: Deserialize<'de> + Default> Deserialize<'de> for Toggle<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Repr<T> {
            Switch(bool),
            Options(T),
        }

        Ok(match Repr::<T>::deserialize(deserializer)? {
            Repr::Switch(false) => Toggle::Disabled,
            Repr::Switch(true) => Toggle::Enabled(T::default()),
            Repr::Options(options) => Toggle::Enabled(options),
        })
    }
}

/// Options for a plain rendered element (container, preview, wrappers,
/// zoom slider).
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ElementOptions {
    /// Element tag name; each render site supplies its own default.
    pub tag: Option<String>,
    /// Attributes emitted verbatim.
    pub attrs: AttrMap,
}

impl ElementOptions {
    pub fn tag_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.tag.as_deref().unwrap_or(default)
    }
}

/// Options for an element carrying label text (buttons, zoom labels).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabeledOptions {
    pub tag: Option<String>,
    /// Label text. Buttons require a non-empty label; zoom labels may render
    /// empty.
    pub label: Option<String>,
    /// Whether the label is HTML-escaped on emission.
    pub encode_label: bool,
    pub attrs: AttrMap,
}

impl Default for LabeledOptions {
    fn default() -> Self {
        Self {
            tag: None,
            label: None,
            encode_label: true,
            attrs: AttrMap::new(),
        }
    }
}

impl LabeledOptions {
    pub fn tag_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.tag.as_deref().unwrap_or(default)
    }
}

/// How the widget's file input and hidden crop field are named.
///
/// The hidden field carries the cropped data URI; the file input receives the
/// source image. Both derive their `name` from one base: `base[original]` for
/// the file input and `base[crop]` for the hidden field.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldBinding {
    /// Free-standing inputs with an explicit base name.
    Plain {
        name: String,
        #[serde(default)]
        value: Option<String>,
    },
    /// Inputs bound to a form model attribute (`Form[attribute]`).
    Model {
        form_name: String,
        attribute: String,
        #[serde(default)]
        value: Option<String>,
    },
}

impl Default for FieldBinding {
    fn default() -> Self {
        FieldBinding::Plain {
            name: "crop-image".to_string(),
            value: None,
        }
    }
}

impl FieldBinding {
    /// Bind to a model attribute, reading the current value from the model.
    pub fn for_model(model: &dyn FormModel, attribute: &str) -> Self {
        FieldBinding::Model {
            form_name: model.form_name().to_string(),
            attribute: attribute.to_string(),
            value: model.value(attribute),
        }
    }

    fn base_name(&self) -> String {
        match self {
            FieldBinding::Plain { name, .. } => name.clone(),
            FieldBinding::Model {
                form_name,
                attribute,
                ..
            } => format!("{form_name}[{attribute}]"),
        }
    }

    pub fn file_input_name(&self) -> String {
        format!("{}[original]", self.base_name())
    }

    pub fn hidden_input_name(&self) -> String {
        format!("{}[crop]", self.base_name())
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            FieldBinding::Plain { value, .. } | FieldBinding::Model { value, .. } => {
                value.as_deref()
            }
        }
    }
}

/// Source of per-instance identity strings.
///
/// An identity scopes every CSS class and selector one widget instance emits,
/// so multiple widgets on one page cannot collide. Callers either put an
/// explicit identity in [`WidgetConfig`] or pass a source; there is no
/// process-global counter.
pub trait IdentitySource {
    fn next_identity(&mut self) -> String;
}

/// Counter-backed identity source yielding `crop0`, `crop1`, …
#[derive(Debug, Clone)]
pub struct IdSequence {
    prefix: String,
    next: usize,
}

impl IdSequence {
    pub fn new() -> Self {
        Self::with_prefix("crop")
    }

    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            next: 0,
        }
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentitySource for IdSequence {
    fn next_identity(&mut self) -> String {
        let identity = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        identity
    }
}

/// Full configuration for one crop widget instance.
///
/// Every field is optional in a config document; stock defaults are filled in
/// at widget construction. `plugin_options` and `export_options` are opaque
/// JSON forwarded to the browser-side plugin's init and export calls.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WidgetConfig {
    /// Per-instance identity; drawn from the [`IdentitySource`] when absent.
    pub identity: Option<String>,
    /// Naming of the file input and hidden crop field.
    pub binding: FieldBinding,
    /// Outer container element (tag defaults to `div`).
    pub container: ElementOptions,
    /// Preview pane element (tag defaults to `div`).
    pub preview: ElementOptions,
    /// Options forwarded to the plugin init call. `Disabled` suppresses
    /// plugin initialization and script registration entirely.
    pub plugin_options: Toggle<serde_json::Map<String, serde_json::Value>>,
    /// Options forwarded to the plugin export call.
    pub export_options: serde_json::Map<String, serde_json::Value>,
    /// Custom script text appended verbatim after the generated bindings.
    pub extra_script: Option<String>,
    /// Select-image button (label defaults to "Select image").
    pub select_button: LabeledOptions,
    /// Crop button (label defaults to "Crop image").
    pub crop_button: LabeledOptions,
    /// Zoom range input. `Disabled` suppresses the whole zoom group,
    /// including both labels and the wrapper.
    pub zoom_slider: Toggle<ElementOptions>,
    /// Zoom-out label (defaults to "-").
    pub zoom_out_label: Toggle<LabeledOptions>,
    /// Zoom-in label (defaults to "+").
    pub zoom_in_label: Toggle<LabeledOptions>,
    /// Wrapper around the zoom group. `Disabled` renders slider and labels
    /// unwrapped.
    pub zoom_wrapper: Toggle<ElementOptions>,
    /// Whether the rotate controls render at all.
    pub rotate: bool,
    /// Counter-clockwise rotate button (label defaults to "CCW").
    pub rotate_left_button: LabeledOptions,
    /// Clockwise rotate button (label defaults to "CW").
    pub rotate_right_button: LabeledOptions,
    /// Wrapper around the rotate buttons.
    pub rotate_wrapper: Toggle<ElementOptions>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            identity: None,
            binding: FieldBinding::default(),
            container: ElementOptions::default(),
            preview: ElementOptions::default(),
            plugin_options: Toggle::default(),
            export_options: serde_json::Map::new(),
            extra_script: None,
            select_button: LabeledOptions::default(),
            crop_button: LabeledOptions::default(),
            zoom_slider: Toggle::default(),
            zoom_out_label: Toggle::default(),
            zoom_in_label: Toggle::default(),
            zoom_wrapper: Toggle::default(),
            rotate: true,
            rotate_left_button: LabeledOptions::default(),
            rotate_right_button: LabeledOptions::default(),
            rotate_wrapper: Toggle::default(),
        }
    }
}
