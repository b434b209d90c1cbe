//! # Cropform
//!
//! Server-side form widget for browser image cropping. The crate renders the
//! HTML fragment and glue script for a cropping control backed by the cropit
//! jQuery plugin, and validates the cropped result (a data-URI string) when
//! the form comes back.
//!
//! # Architecture: Three Loosely Coupled Pieces
//!
//! ```text
//! 1. CropWidget        options → HTML fragment + registered glue script
//! 2. DataUriValidator  submitted string → ok | recorded error (+ client JS)
//! 3. Asset bundles     static manifests for the plugin script + jQuery
//! ```
//!
//! The pieces only meet through page-level registration: the widget
//! registers the plugin bundle and its generated script with a
//! [`View`](assets::View), and the validator checks the hidden field the
//! widget emitted. Nothing here decodes or stores images: all cropping math
//! happens in the browser-side plugin, and the exported bytes are opaque to
//! this crate.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`widget`] | The crop widget: normalization, HTML emission, glue-script generation |
//! | [`options`] | Typed widget configuration: element/label options, toggles, bindings, identities |
//! | [`validator`] | Data-URI grammar, server-side check, client-side script fragment |
//! | [`assets`] | Asset-bundle manifests and the page-level registration collector |
//! | [`form`] | Form-model seam and structured validation errors |
//! | [`html`] | Dynamic tag/attribute emission, escaping, script-safe JSON |
//!
//! # Design Decisions
//!
//! ## Typed Options Over Attribute Maps
//!
//! Rendering options are structs with named fields (`tag`, `label`,
//! `encode_label`) plus an open attribute map, and switchable controls are
//! [`options::Toggle`] values. There are no reserved attribute keys and no
//! `false` sentinel hiding in a map type.
//!
//! ## Normalize Once, Render Pure
//!
//! All defaulting and class injection happens at widget construction, which
//! is also where configuration errors (an empty button label) surface.
//! Rendering afterwards is a pure function: the same widget renders
//! byte-identically every time, attributes sorted, JSON keys sorted.
//!
//! ## Explicit Identity
//!
//! Every CSS class and selector a widget emits is scoped by a per-instance
//! identity (`<identity>_<role>`). The identity is either supplied in the
//! config or drawn from a caller-owned [`options::IdSequence`]; there is no
//! global counter.
//!
//! ## One Grammar, Both Sides
//!
//! The validator's regex is a single pattern constant; the client-side
//! fragment embeds the identical source with the same case-insensitivity, so
//! server and browser accept the same strings.

pub mod assets;
pub mod form;
pub mod html;
pub mod options;
pub mod validator;
pub mod widget;
