//! Page controller integration tests
//!
//! Drives a full page through initialization and selection changes: cascading
//! corrections, condition re-evaluation, block toggling, placeholder text and
//! navigation rebuilds.

use doc_prefs::core::config::ControllerConfig;
use doc_prefs::core::error::PrefsError;
use doc_prefs::core::types::{ContentRef, OptionId, PrefId};
use doc_prefs::expression::{encode, EvalError, Expr};
use doc_prefs::page::{Document, PageController, PageManifest};
use doc_prefs::preferences::OptionSource;

/// Install page with an os preference and an os-dependent package preference
const MANIFEST: &str = r#"{
    "data": {
        "preferences": [
            { "id": "os", "label": "Platform", "options": ["linux", "windows"], "default": "linux" },
            { "id": "pkg", "label": "Package", "options": ["{os}-stable", "{os}-beta"], "default": "{os}-stable" }
        ],
        "options": [
            { "id": "linux", "label": "Linux" },
            { "id": "windows", "label": "Windows" },
            { "id": "linux-stable", "label": "Stable", "value": "apt install tool" },
            { "id": "linux-beta", "label": "Beta", "value": "apt install tool-beta" },
            { "id": "windows-stable", "label": "Stable", "value": "winget install tool" },
            { "id": "windows-beta", "label": "Beta", "value": "winget install tool-beta" }
        ],
        "conditions": {
            "win-beta": ["and", ["eq", "os", "windows"], ["eq", "pkg", "windows-beta"]],
            "not-windows": ["ne", "os", "windows"]
        }
    },
    "body": {
        "tag": "body",
        "children": [
            { "tag": "div", "attrs": { "id": "pref-chooser" } },
            { "tag": "nav", "attrs": { "id": "page-toc" } },
            {
                "tag": "main",
                "attrs": { "id": "main-content" },
                "children": [
                    { "tag": "h2", "attrs": { "id": "install" }, "children": ["Install"] },
                    { "tag": "code", "attrs": { "data-pref-placeholder": "pkg" } },
                    {
                        "tag": "section",
                        "attrs": { "data-content-ref": "win-beta" },
                        "children": [
                            { "tag": "h3", "attrs": { "id": "beta-notes" }, "children": ["Beta notes"] }
                        ]
                    },
                    {
                        "tag": "section",
                        "attrs": { "data-content-ref": "not-windows" },
                        "children": [
                            { "tag": "h3", "children": ["Permissions"] }
                        ]
                    },
                    { "tag": "h2", "attrs": { "id": "usage" }, "children": ["Usage"] }
                ]
            }
        ]
    }
}"#;

fn load_page() -> (PageController, PageManifest) {
    let manifest = PageManifest::from_json(MANIFEST).unwrap();
    let mut controller =
        PageController::new(ControllerConfig::default(), Document::new(&manifest.body));
    controller.initialize(&manifest.data).unwrap();
    controller.on_page_ready().unwrap();
    (controller, manifest)
}

fn selected(controller: &PageController, pref: &str) -> String {
    controller.selection().unwrap()[&PrefId::from(pref)]
        .as_str()
        .to_string()
}

fn visible(controller: &PageController, content_ref: &str) -> bool {
    controller
        .is_block_visible(&ContentRef::from(content_ref))
        .unwrap()
}

fn placeholder_text(controller: &PageController) -> String {
    let doc = controller.document();
    let node = doc.elements_with_attr("data-pref-placeholder")[0];
    doc.text_content(node)
}

fn nav_texts(controller: &PageController) -> Vec<String> {
    let doc = controller.document();
    let nav = doc.element_by_id("page-toc").unwrap();
    doc.descendants(nav)
        .into_iter()
        .filter(|&n| matches!(doc.tag(n), Some("a") | Some("span")))
        .map(|n| doc.text_content(n))
        .collect()
}

#[test]
fn test_initial_state_uses_defaults() {
    let (controller, _) = load_page();

    assert_eq!(selected(&controller, "os"), "linux");
    assert_eq!(selected(&controller, "pkg"), "linux-stable");
    assert!(!visible(&controller, "win-beta"));
    assert!(visible(&controller, "not-windows"));
    assert_eq!(placeholder_text(&controller), "apt install tool");
    assert_eq!(nav_texts(&controller), vec!["Install", "Permissions", "Usage"]);
}

#[test]
fn test_cascade_show_then_hide_beta_block() {
    let (mut controller, _) = load_page();

    // switching platform invalidates the linux package
    let report = controller
        .on_selection_changed(&"os".into(), &"windows".into())
        .unwrap();
    assert_eq!(report.corrected, vec![PrefId::from("pkg")]);
    assert_eq!(selected(&controller, "pkg"), "windows-stable");
    assert_eq!(report.changed, vec![ContentRef::from("not-windows")]);
    assert!(!visible(&controller, "win-beta"));
    assert!(!visible(&controller, "not-windows"));

    let report = controller
        .on_selection_changed(&"pkg".into(), &"windows-beta".into())
        .unwrap();
    assert!(report.corrected.is_empty());
    assert_eq!(report.changed, vec![ContentRef::from("win-beta")]);
    assert_eq!(report.toggled, 1);
    assert!(visible(&controller, "win-beta"));
    assert_eq!(placeholder_text(&controller), "winget install tool-beta");
    assert_eq!(nav_texts(&controller), vec!["Install", "Beta notes", "Usage"]);

    // back to linux: windows-beta is no longer offered and falls back
    let report = controller
        .on_selection_changed(&"os".into(), &"linux".into())
        .unwrap();
    assert_eq!(report.corrected, vec![PrefId::from("pkg")]);
    assert_eq!(selected(&controller, "pkg"), "linux-stable");
    assert!(!visible(&controller, "win-beta"));
    assert!(visible(&controller, "not-windows"));
    assert_eq!(report.toggled, 2);
    assert_eq!(nav_texts(&controller), vec!["Install", "Permissions", "Usage"]);
}

#[test]
fn test_unchanged_conditions_do_not_toggle() {
    let (mut controller, _) = load_page();

    let report = controller
        .on_selection_changed(&"pkg".into(), &"linux-beta".into())
        .unwrap();
    assert!(report.changed.is_empty());
    assert_eq!(report.toggled, 0);
    assert_eq!(placeholder_text(&controller), "apt install tool-beta");

    // reselecting the current option is a no-op for content
    let report = controller
        .on_selection_changed(&"pkg".into(), &"linux-beta".into())
        .unwrap();
    assert!(report.changed.is_empty());
    assert!(report.corrected.is_empty());
}

#[test]
fn test_chooser_reflects_cascaded_options() {
    let (mut controller, _) = load_page();
    controller
        .on_selection_changed(&"os".into(), &"windows".into())
        .unwrap();

    assert!(controller
        .option_control(&"pkg".into(), &"windows-beta".into())
        .is_some());
    assert!(controller
        .option_control(&"pkg".into(), &"linux-beta".into())
        .is_none());

    let doc = controller.document();
    let control = controller
        .option_control(&"pkg".into(), &"windows-stable".into())
        .unwrap();
    assert!(doc.has_class(control, "selected"));
    assert_eq!(doc.text_content(control), "Stable");
}

#[test]
fn test_click_cascade_through_chooser() {
    let (mut controller, _) = load_page();

    let windows = controller
        .option_control(&"os".into(), &"windows".into())
        .unwrap();
    controller.handle_click(windows).unwrap().unwrap();

    // controls are rewired after every re-render
    let beta = controller
        .option_control(&"pkg".into(), &"windows-beta".into())
        .unwrap();
    let report = controller.handle_click(beta).unwrap().unwrap();
    assert_eq!(report.changed, vec![ContentRef::from("win-beta")]);
    assert!(visible(&controller, "win-beta"));

    // a stale control no longer dispatches
    assert_eq!(controller.handle_click(windows).unwrap(), None);
}

#[test]
fn test_textual_conditions_compile_to_manifest_form() {
    let expr = Expr::parse(r#"os == "windows" && pkg == "windows-beta""#).unwrap();
    let (_, manifest) = load_page();
    assert_eq!(
        encode(&expr),
        manifest.data.conditions[&ContentRef::from("win-beta")]
    );
}

#[test]
fn test_default_not_offered_is_rejected() {
    let mut manifest = PageManifest::from_json(MANIFEST).unwrap();
    manifest.data.preferences[1].default = "{os}-nightly".to_string();

    let mut controller =
        PageController::new(ControllerConfig::default(), Document::new(&manifest.body));
    let err = controller.initialize(&manifest.data).unwrap_err();
    assert!(matches!(err, PrefsError::DefaultNotOffered { .. }));
    assert!(err.is_configuration());
    assert!(!controller.is_ready());
}

#[test]
fn test_forward_reference_is_rejected() {
    let mut manifest = PageManifest::from_json(MANIFEST).unwrap();
    manifest.data.preferences.swap(0, 1);

    let mut controller =
        PageController::new(ControllerConfig::default(), Document::new(&manifest.body));
    assert!(matches!(
        controller.initialize(&manifest.data),
        Err(PrefsError::ForwardReference { .. })
    ));
}

#[test]
fn test_initial_selection_is_corrected() {
    let mut manifest = PageManifest::from_json(MANIFEST).unwrap();
    manifest
        .data
        .selection
        .insert(PrefId::from("os"), OptionId::from("windows"));
    manifest
        .data
        .selection
        .insert(PrefId::from("pkg"), OptionId::from("linux-beta"));

    let mut controller =
        PageController::new(ControllerConfig::default(), Document::new(&manifest.body));
    controller.initialize(&manifest.data).unwrap();
    assert_eq!(selected(&controller, "os"), "windows");
    assert_eq!(selected(&controller, "pkg"), "windows-stable");
    assert!(!visible(&controller, "not-windows"));
}

#[test]
fn test_duplicate_preference_is_rejected() {
    let mut manifest = PageManifest::from_json(MANIFEST).unwrap();
    let mut shadow = manifest.data.preferences[0].clone();
    shadow.options = OptionSource::Inline(vec!["windows".to_string()]);
    shadow.default = "windows".to_string();
    manifest.data.preferences.push(shadow);

    let mut controller =
        PageController::new(ControllerConfig::default(), Document::new(&manifest.body));
    match controller.initialize(&manifest.data) {
        Err(PrefsError::DuplicatePreference(id)) => assert_eq!(id.as_str(), "os"),
        other => panic!("Expected duplicate preference, got {:?}", other),
    }
    assert!(!controller.is_ready());
}

#[test]
fn test_condition_on_undeclared_preference_fails_initialize() {
    let mut manifest = PageManifest::from_json(MANIFEST).unwrap();
    manifest.data.conditions.insert(
        ContentRef::from("win-beta"),
        serde_json::json!(["eq", "arch", "arm64"]),
    );

    let mut controller =
        PageController::new(ControllerConfig::default(), Document::new(&manifest.body));
    match controller.initialize(&manifest.data) {
        Err(PrefsError::Expression(EvalError::UnresolvedVariable(pref))) => {
            assert_eq!(pref.as_str(), "arch")
        }
        other => panic!("Expected unresolved variable, got {:?}", other),
    }
    assert!(!controller.is_ready());
}
