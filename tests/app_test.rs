use admitui::client::ApiClient;
use admitui::config::{AppConfig, ConfigManager};
use admitui::form::SearchForm;
use admitui::session::UserStore;
use admitui::table::{Column, ResultsTable};
use admitui::{App, AppEvent, ServiceKind};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};
use tempfile::TempDir;

// Backend at a closed port: requests fail fast, which is all these tests need
const UNREACHABLE: &str = "http://127.0.0.1:9";

fn setup_app(service: ServiceKind) -> (TempDir, App) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut config = AppConfig::default();
    config.server.base_url = UNREACHABLE.to_string();
    config.server.timeout_secs = 1;
    config.downloads.dir = Some(temp_dir.path().join("downloads"));

    let client = ApiClient::new(UNREACHABLE, Duration::from_secs(1)).expect("client builds");
    let store = UserStore::new(ConfigManager::with_dir(temp_dir.path().to_path_buf()));
    let (tx, _rx) = channel::<AppEvent>();
    let app = App::with_parts(tx, service, config, client, store);
    (temp_dir, app)
}

fn key(code: KeyCode) -> AppEvent {
    AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn sample_table() -> ResultsTable {
    ResultsTable::new(
        vec![Column::text("College"), Column::integer("Rank")],
        vec![
            vec!["IIT Bombay".into(), "30".into()],
            vec!["NIT Trichy".into(), "5".into()],
        ],
    )
}

fn sample_form() -> SearchForm {
    SearchForm {
        rank: 777,
        category: "OPEN".to_string(),
        college_type: "All".to_string(),
        branch: "All".to_string(),
        round: None,
        min_probability: None,
    }
}

#[test]
fn test_rapid_filter_input_collapses_to_one_execution() {
    let (_temp_dir, mut app) = setup_app(ServiceKind::Mhtcet);
    app.table = Some(sample_table());

    // Enter filter mode and type a burst of characters
    let _ = app.event(&key(KeyCode::Char('/')));
    for c in "nit".chars() {
        let _ = app.event(&key(KeyCode::Char(c)));
    }

    let now = Instant::now();
    assert!(app.due_events(now).is_empty());

    // After the quiescence window exactly one application fires, carrying
    // the final query value
    let due = app.due_events(now + Duration::from_millis(400));
    assert_eq!(due.len(), 1);
    match &due[0] {
        AppEvent::ApplyFilter(query) => assert_eq!(query, "nit"),
        _ => panic!("expected ApplyFilter"),
    }
    assert!(app
        .due_events(now + Duration::from_millis(800))
        .is_empty());

    for event in due {
        let _ = app.event(&event);
    }
    let table = app.table.as_ref().expect("table present");
    assert_eq!(table.visible_rows(), vec![1]);
}

#[test]
fn test_enter_applies_filter_immediately_and_cancels_pending() {
    let (_temp_dir, mut app) = setup_app(ServiceKind::Mhtcet);
    app.table = Some(sample_table());

    let _ = app.event(&key(KeyCode::Char('/')));
    let _ = app.event(&key(KeyCode::Char('i')));
    let applied = app.event(&key(KeyCode::Enter));
    match applied {
        Some(AppEvent::ApplyFilter(query)) => assert_eq!(query, "i"),
        _ => panic!("expected immediate ApplyFilter"),
    }
    // The pending debounced invocation was superseded
    assert!(app
        .due_events(Instant::now() + Duration::from_secs(1))
        .is_empty());
}

#[test]
fn test_export_carries_last_submitted_form_not_view_state() {
    let (_temp_dir, mut app) = setup_app(ServiceKind::Mhtcet);
    let form = sample_form();

    // Submit records the form before the request runs
    let next = app.event(&AppEvent::Search(form.clone()));
    let do_search = match next {
        Some(AppEvent::DoSearch(f)) => {
            assert_eq!(f, form);
            AppEvent::DoSearch(f)
        }
        _ => panic!("expected DoSearch"),
    };
    // The backend is unreachable; the failure clears the loading flag and
    // keeps the form
    let _ = app.event(&do_search);
    assert!(!app.is_loading());
    assert_eq!(app.last_form(), Some(&form));

    // Give the client something to look at, then mangle the view state
    app.table = Some(sample_table());
    let _ = app.event(&AppEvent::Sort(1));
    let _ = app.event(&AppEvent::Sort(1));
    let _ = app.event(&AppEvent::ApplyFilter("nit".to_string()));

    let next = app.event(&AppEvent::Export(admitui::export::ExportFormat::Csv));
    match next {
        Some(AppEvent::DoExport(format, exported)) => {
            assert_eq!(format, admitui::export::ExportFormat::Csv);
            assert_eq!(exported, form);
        }
        _ => panic!("expected DoExport"),
    }
}

#[test]
fn test_second_search_is_rejected_while_loading() {
    let (_temp_dir, mut app) = setup_app(ServiceKind::Josaa);
    let form = sample_form();

    let first = app.event(&AppEvent::Search(form.clone()));
    assert!(matches!(first, Some(AppEvent::DoSearch(_))));
    assert!(app.is_loading());

    let second = app.event(&AppEvent::Search(form));
    assert!(second.is_none());
    assert!(app.is_loading());
    let status = app.status().expect("rejection is surfaced");
    assert_eq!(status.message, "Please wait for the current request");
}

#[test]
fn test_failed_search_keeps_previous_results() {
    let (_temp_dir, mut app) = setup_app(ServiceKind::Mhtcet);
    app.table = Some(sample_table());
    let _ = app.event(&AppEvent::ApplyFilter("iit".to_string()));

    let next = app.event(&AppEvent::Search(sample_form()));
    if let Some(event) = next {
        let _ = app.event(&event);
    }

    // The request failed; the previous table and its filter are untouched
    let table = app.table.as_ref().expect("table still present");
    assert_eq!(table.filter(), "iit");
    assert_eq!(table.visible_rows(), vec![0]);
}

#[test]
fn test_export_without_results_is_refused() {
    let (_temp_dir, mut app) = setup_app(ServiceKind::Mhtcet);
    let next = app.event(&AppEvent::Export(admitui::export::ExportFormat::Excel));
    assert!(next.is_none());
    assert!(!app.is_loading());
    let status = app.status().expect("refusal is surfaced");
    assert_eq!(status.kind, admitui::StatusKind::Error);
    assert_eq!(status.message, "Nothing to export yet");
}

#[test]
fn test_submitting_search_without_login_opens_auth_modal() {
    let (_temp_dir, mut app) = setup_app(ServiceKind::Mhtcet);
    assert!(app.session.is_none());

    let _ = app.event(&key(KeyCode::Char('g')));
    assert!(app.search_modal.active);
    for c in "1500".chars() {
        let _ = app.event(&key(KeyCode::Char(c)));
    }
    app.search_modal.focus = admitui::search_modal::SearchFocus::Submit;
    let next = app.event(&key(KeyCode::Enter));

    assert!(next.is_none());
    assert!(app.auth_modal.active);
}

#[test]
fn test_logged_in_submit_produces_search_event() {
    let (temp_dir, mut app) = setup_app(ServiceKind::Mhtcet);
    // Create an account through the same store the app uses
    let store = UserStore::new(ConfigManager::with_dir(temp_dir.path().to_path_buf()));
    let session = store
        .signup("Asha", "asha@example.com", "hunter22", "hunter22")
        .expect("signup succeeds");
    app.session = Some(session);

    let _ = app.event(&key(KeyCode::Char('g')));
    for c in "1500".chars() {
        let _ = app.event(&key(KeyCode::Char(c)));
    }
    app.search_modal.focus = admitui::search_modal::SearchFocus::Submit;
    let next = app.event(&key(KeyCode::Enter));

    match next {
        Some(AppEvent::Search(form)) => {
            assert_eq!(form.rank, 1500);
            assert_eq!(form.category, "All");
        }
        _ => panic!("expected Search event"),
    }
    assert!(!app.search_modal.active);
}

#[test]
fn test_resize_recompute_is_debounced() {
    let (_temp_dir, mut app) = setup_app(ServiceKind::Mhtcet);

    let _ = app.event(&AppEvent::Resize(120, 40));
    let _ = app.event(&AppEvent::Resize(60, 40));

    let now = Instant::now();
    assert!(app.due_events(now).is_empty());
    let due = app.due_events(now + Duration::from_millis(300));
    assert_eq!(due.len(), 1);
    assert!(matches!(due[0], AppEvent::ApplyResize));
}
