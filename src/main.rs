use clap::{Parser, Subcommand};
use cropform::assets::{Page, View};
use cropform::options::{IdSequence, WidgetConfig};
use cropform::validator::DataUriValidator;
use cropform::widget::{CropWidget, scoped_class};
use maud::{DOCTYPE, html};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cropform")]
#[command(about = "Render and validate image-crop form widgets")]
#[command(long_about = "\
Render and validate image-crop form widgets

Renders the HTML fragment and glue script for an image cropping control,
either standalone or embedded in a complete demo page, and checks submitted
values against the data-URI grammar.

Widget configuration is a sparse JSON document; every key is optional:

  {
    \"identity\": \"avatar\",
    \"select_button\": { \"label\": \"Pick a photo\" },
    \"zoom_wrapper\": false,
    \"plugin_options\": { \"imageBackground\": true },
    \"export_options\": { \"originalSize\": true }
  }

Set a control group to false to disable it (e.g. \"zoom_slider\": false).")]
#[command(version)]
struct Cli {
    /// JSON widget configuration file (stock defaults when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the widget fragment and its script tags
    Render,
    /// Render a complete standalone demo page
    Page,
    /// Check a string against the data-URI grammar
    Validate {
        /// The value to check
        value: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Render => {
            let config = load_config(cli.config.as_deref())?;
            let mut ids = IdSequence::new();
            let widget = CropWidget::new(config, &mut ids)?;
            let mut page = Page::new();
            let fragment = widget.render(&mut page);
            println!("{}", fragment.into_string());
            println!("{}", page.script_tags().into_string());
        }
        Command::Page => {
            let config = load_config(cli.config.as_deref())?;
            println!("{}", render_demo_page(config)?);
        }
        Command::Validate { value } => {
            let validator = DataUriValidator::new();
            match validator.validate_value(&value, "Value") {
                Ok(()) => println!("valid data URI"),
                Err(message) => {
                    eprintln!("{message}");
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<WidgetConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?),
        None => Ok(WidgetConfig::default()),
    }
}

/// Full demo page: a form wrapping the widget, pre-submit validation wired
/// to the hidden crop field, and the registered script tags at the end of
/// the body.
fn render_demo_page(config: WidgetConfig) -> Result<String, Box<dyn std::error::Error>> {
    let mut ids = IdSequence::new();
    let widget = CropWidget::new(config, &mut ids)?;
    let mut page = Page::new();
    let fragment = widget.render(&mut page);

    let validator = DataUriValidator::new();
    let guard = format!(
        "jQuery('form').on('submit', function (event) {{ \
var value = jQuery('.{data}').val() || ''; var messages = []; {check} \
if (messages.length) {{ alert(messages.join('\\n')); event.preventDefault(); }} }});",
        data = scoped_class(widget.identity(), "crop-image-data"),
        check = validator.client_script("Cropped image"),
    );
    page.register_js(&guard);

    let document = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                title { "Crop widget demo" }
            }
            body {
                form method="post" action="#" {
                    (fragment)
                    button type="submit" { "Save" }
                }
                (page.script_tags())
            }
        }
    };

    Ok(document.into_string())
}
