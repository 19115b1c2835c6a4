use std::io::Cursor;

use super::*;

fn context(server: Option<&str>) -> (tempfile::TempDir, CliContext) {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = CliContext {
        store: SessionStore::new(dir.path().join("session.json")),
        server: server.map(ToOwned::to_owned),
    };
    (dir, ctx)
}

// =============================================================
// read_password
// =============================================================

#[test]
fn read_password_strips_line_ending() {
    let password = read_password(Cursor::new("s3cret\r\n")).expect("password");
    assert_eq!(password, "s3cret");
}

#[test]
fn empty_prompted_password_is_rejected() {
    assert!(matches!(non_empty_password(""), Err(CliError::MissingPassword)));
    assert_eq!(non_empty_password("pw").expect("password"), "pw");
}

#[test]
fn read_password_rejects_empty_input() {
    assert!(matches!(read_password(Cursor::new("")), Err(CliError::MissingPassword)));
    assert!(matches!(read_password(Cursor::new("\n")), Err(CliError::MissingPassword)));
}

// =============================================================
// CliContext
// =============================================================

#[test]
fn session_override_wins_over_saved_server() {
    let (_dir, ctx) = context(Some("http://override:9000/"));
    ctx.store.set_server("http://saved:8000").expect("save");
    let session = ctx.session().expect("session");
    assert_eq!(session.base_url.as_deref(), Some("http://override:9000"));
}

#[test]
fn invalid_override_is_reported() {
    let (_dir, ctx) = context(Some("saved:8000"));
    assert!(matches!(ctx.session(), Err(CliError::Session(SessionError::InvalidServerUrl(_)))));
}

#[test]
fn client_without_any_server_is_refused() {
    let (_dir, ctx) = context(None);
    assert!(matches!(ctx.client(), Err(CliError::Api(ApiError::ServerNotConfigured))));
}

#[test]
fn session_summary_never_prints_token() {
    let (_dir, ctx) = context(None);
    ctx.store.set_server("http://host:8000").expect("server");
    let session = ctx.store.sign_in("tok-secret", Some("superviseur")).expect("sign in");

    let summary = session_summary(&ctx, &session).expect("summary");
    assert_eq!(summary["signed_in"], serde_json::json!(true));
    assert_eq!(summary["role"], serde_json::json!("superviseur"));
    assert_eq!(summary["server"], serde_json::json!("http://host:8000"));
    assert!(summary.get("token").is_none());
    assert!(!summary.to_string().contains("tok-secret"));
}

#[test]
fn session_summary_shows_effective_and_stored_server() {
    let (_dir, ctx) = context(Some("http://override:9000"));
    let stored = ctx.store.set_server("http://saved:8000").expect("save");

    let summary = session_summary(&ctx, &stored).expect("summary");
    assert_eq!(summary["server"], serde_json::json!("http://override:9000"));
    assert_eq!(summary["stored_server"], serde_json::json!("http://saved:8000"));
}

#[test]
fn session_summary_without_override_reports_stored_server_twice() {
    let (_dir, ctx) = context(None);
    let stored = ctx.store.set_server("http://saved:8000").expect("save");

    let summary = session_summary(&ctx, &stored).expect("summary");
    assert_eq!(summary["server"], summary["stored_server"]);
}

// =============================================================
// argument parsing
// =============================================================

#[test]
fn parses_visit_submit_with_global_server_after_subcommand() {
    let cli = Cli::try_parse_from([
        "fieldvisit",
        "visit",
        "submit",
        "--client-id",
        "12",
        "--draft",
        "visit.json",
        "--dry-run",
        "--server",
        "http://host:8000",
    ])
    .expect("parse");
    assert_eq!(cli.server.as_deref(), Some("http://host:8000"));
    let Command::Visit(VisitCommand {
        command: VisitSubcommand::Submit { client_id, draft, dry_run },
    }) = cli.command
    else {
        panic!("expected visit submit");
    };
    assert_eq!(client_id, 12);
    assert_eq!(draft, PathBuf::from("visit.json"));
    assert!(dry_run);
}

#[test]
fn parses_review_commands() {
    let cli = Cli::try_parse_from(["fieldvisit", "review", "reject", "7"]).expect("parse");
    assert!(matches!(
        cli.command,
        Command::Review(ReviewCommand { command: ReviewSubcommand::Reject { visit_id: 7 } })
    ));

    let cli = Cli::try_parse_from(["fieldvisit", "review", "export", "--out", "team.csv"]).expect("parse");
    assert!(matches!(
        cli.command,
        Command::Review(ReviewCommand { command: ReviewSubcommand::Export { .. } })
    ));
}

#[test]
fn visit_submit_requires_client_id() {
    assert!(Cli::try_parse_from(["fieldvisit", "visit", "submit", "--draft", "visit.json"]).is_err());
}
