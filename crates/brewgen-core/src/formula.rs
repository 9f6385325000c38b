//! Homebrew formula rendering.
//!
//! Templates are Jinja-style and rendered with minijinja. A template sees
//! `name`, `class`, `binary`, `description`, `homepage`, `version` and
//! `assets`, a map from classifier to `{ classifier, url, sha256 }`.
//! Undefined values are render errors, so guard platform blocks with
//! `{% if "<classifier>" in assets %}` rather than a truthiness test.

use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::asset::AssetDescriptor;

/// Built-in formula template. Platforms missing from the release are left out.
pub const DEFAULT_TEMPLATE: &str = r#"class {{ class }} < Formula
  desc "{{ description }}"
  homepage "{{ homepage }}"
  version "{{ version }}"

  on_macos do
    if Hardware::CPU.intel?
    {%- if "amd64-macos" in assets %}
      url "{{ assets["amd64-macos"].url }}"
      sha256 "{{ assets["amd64-macos"].sha256 }}"
    {%- endif %}
    end

    if Hardware::CPU.arm?
    {%- if "arm64-macos" in assets %}
      url "{{ assets["arm64-macos"].url }}"
      sha256 "{{ assets["arm64-macos"].sha256 }}"
    {%- endif %}
    end
  end

  on_linux do
    if Hardware::CPU.intel?
    {%- if "amd64-linux" in assets %}
      url "{{ assets["amd64-linux"].url }}"
      sha256 "{{ assets["amd64-linux"].sha256 }}"
    {%- endif %}
    end

    if Hardware::CPU.arm? && Hardware::CPU.is_64_bit?
    {%- if "arm64-linux" in assets %}
      url "{{ assets["arm64-linux"].url }}"
      sha256 "{{ assets["arm64-linux"].sha256 }}"
    {%- endif %}
    end
  end

  def install
    bin.install "{{ binary }}"
  end
end
"#;

/// Release data handed to the renderer. Every asset has its digest recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseMetadata {
    /// Formula name, e.g. `span-cli`.
    pub name: String,
    /// Binary installed by the formula.
    pub binary: String,
    pub description: String,
    pub homepage: String,
    /// Release tag without the leading `v`.
    pub version: String,
    /// Hashed assets keyed by classifier (e.g. `amd64-linux`).
    pub assets: BTreeMap<String, AssetDescriptor>,
}

impl ReleaseMetadata {
    /// Ruby class name for the formula: `span-cli` -> `SpanCli`.
    pub fn class_name(&self) -> String {
        class_name(&self.name)
    }
}

/// What a template can refer to.
#[derive(Debug, Serialize)]
struct FormulaContext<'a> {
    name: &'a str,
    class: String,
    binary: &'a str,
    description: &'a str,
    homepage: &'a str,
    version: &'a str,
    assets: &'a BTreeMap<String, AssetDescriptor>,
}

impl<'a> From<&'a ReleaseMetadata> for FormulaContext<'a> {
    fn from(meta: &'a ReleaseMetadata) -> Self {
        Self {
            name: &meta.name,
            class: meta.class_name(),
            binary: &meta.binary,
            description: &meta.description,
            homepage: &meta.homepage,
            version: &meta.version,
            assets: &meta.assets,
        }
    }
}

fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_keep_trailing_newline(true);
    env
}

/// Compiles `src` without rendering it, reporting syntax errors.
pub fn check_template(src: &str) -> Result<(), minijinja::Error> {
    environment().template_from_str(src).map(|_| ())
}

/// Renders `src` against `meta`. Values are inserted verbatim.
pub fn render_formula(src: &str, meta: &ReleaseMetadata) -> Result<String, minijinja::Error> {
    environment().render_str(src, FormulaContext::from(meta))
}

/// CamelCases a formula name, treating any non-alphanumeric character as a word break.
pub fn class_name(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}
