//! End-to-end flow: configure a widget, render it into a page, and validate
//! a submitted value the way a form round trip would.

use cropform::assets::Page;
use cropform::form::{FormModel, ValidationErrors};
use cropform::options::{FieldBinding, IdSequence, Toggle, WidgetConfig};
use cropform::validator::{DATA_URI_PATTERN, DataUriValidator};
use cropform::widget::{CropWidget, scoped_class};

struct ProfileForm {
    avatar_crop: Option<String>,
}

impl FormModel for ProfileForm {
    fn form_name(&self) -> &str {
        "ProfileForm"
    }

    fn value(&self, attribute: &str) -> Option<String> {
        match attribute {
            "avatar_crop" => self.avatar_crop.clone(),
            _ => None,
        }
    }
}

fn profile_config() -> WidgetConfig {
    let model = ProfileForm { avatar_crop: None };
    let mut config = WidgetConfig::default();
    config.binding = FieldBinding::for_model(&model, "avatar_crop");
    config.select_button.label = Some("Pick a photo".to_string());
    config
        .export_options
        .insert("originalSize".to_string(), serde_json::json!(true));
    config
}

#[test]
fn widget_renders_into_page_with_assets_and_script() {
    let mut ids = IdSequence::new();
    let widget = CropWidget::new(profile_config(), &mut ids).unwrap();
    let mut page = Page::new();
    let fragment = widget.render(&mut page).into_string();

    // Model-bound input names and instance-scoped classes.
    assert!(fragment.contains("ProfileForm[avatar_crop][original]"));
    assert!(fragment.contains("ProfileForm[avatar_crop][crop]"));
    assert!(fragment.contains(&scoped_class("crop0", "crop-image-data")));
    assert!(fragment.contains("Pick a photo"));

    // jQuery loads before the plugin, the plugin before the inline glue.
    let tags = page.script_tags().into_string();
    let jquery = tags.find("jquery.min.js").unwrap();
    let cropit = tags.find("jquery.cropit.js").unwrap();
    let glue = tags.find("jQuery('#crop0').cropit();").unwrap();
    assert!(jquery < cropit);
    assert!(cropit < glue);
    assert!(tags.contains("cropit('export', {\"originalSize\":true})"));
}

#[test]
fn two_widgets_on_one_page_do_not_collide() {
    let mut ids = IdSequence::new();
    let first = CropWidget::new(WidgetConfig::default(), &mut ids).unwrap();
    let second = CropWidget::new(WidgetConfig::default(), &mut ids).unwrap();

    let mut page = Page::new();
    let html = format!(
        "{}\n{}",
        first.render(&mut page).into_string(),
        second.render(&mut page).into_string()
    );

    assert!(html.contains("crop0_select-image-btn"));
    assert!(html.contains("crop1_select-image-btn"));
    assert_eq!(page.bundles().len(), 2, "bundles registered once per page");
    assert_eq!(page.scripts().len(), 2, "one glue script per widget");
}

#[test]
fn config_document_drives_rendering() {
    let config: WidgetConfig = serde_json::from_str(
        r#"{
            "identity": "avatar",
            "zoom_slider": false,
            "rotate": false,
            "crop_button": { "label": "Done" }
        }"#,
    )
    .unwrap();

    let mut ids = IdSequence::new();
    let widget = CropWidget::new(config, &mut ids).unwrap();
    let mut page = Page::new();
    let html = widget.render(&mut page).into_string();

    assert!(html.contains(r#"id="avatar""#));
    assert!(!html.contains("zoom"));
    assert!(!html.contains("rotate"));
    assert!(html.contains(">Done</button>"));
}

#[test]
fn submitted_value_round_trip() {
    let validator = DataUriValidator::new();
    let mut errors = ValidationErrors::new();

    let good = ProfileForm {
        avatar_crop: Some("data:image/png;base64,iVBORw0KGgo=".to_string()),
    };
    validator.validate_attribute(&good, "avatar_crop", &mut errors);
    assert!(errors.is_empty());

    let bad = ProfileForm {
        avatar_crop: Some("definitely not".to_string()),
    };
    validator.validate_attribute(&bad, "avatar_crop", &mut errors);
    assert_eq!(
        errors.attribute("avatar_crop"),
        ["Avatar Crop is not a valid data URI."]
    );
}

#[test]
fn client_and_server_share_one_grammar() {
    let validator = DataUriValidator::new();
    let script = validator.client_script("Cropped image");
    assert!(script.contains(DATA_URI_PATTERN));
    assert!(script.contains("Cropped image is not a valid data URI."));
}

#[test]
fn same_configuration_renders_identically() {
    let mut first_ids = IdSequence::new();
    let mut second_ids = IdSequence::new();
    let first = CropWidget::new(profile_config(), &mut first_ids).unwrap();
    let second = CropWidget::new(profile_config(), &mut second_ids).unwrap();

    let mut first_page = Page::new();
    let mut second_page = Page::new();
    assert_eq!(
        first.render(&mut first_page).into_string(),
        second.render(&mut second_page).into_string()
    );
    assert_eq!(first_page.scripts(), second_page.scripts());
}

#[test]
fn disabled_zoom_keeps_script_bindings_for_remaining_controls() {
    let mut config = WidgetConfig {
        identity: Some("w9".to_string()),
        ..WidgetConfig::default()
    };
    config.zoom_slider = Toggle::Disabled;

    let mut ids = IdSequence::new();
    let widget = CropWidget::new(config, &mut ids).unwrap();
    let mut page = Page::new();
    widget.render(&mut page);

    let js = &page.scripts()[0];
    assert!(js.contains("w9_select-image-btn"));
    assert!(js.contains("w9_crop-image-btn"));
    assert!(js.contains("rotateCW"));
}
