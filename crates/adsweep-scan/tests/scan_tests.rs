use std::fs;
use std::path::Path;

use tempfile::TempDir;

use adsweep_core::{
    LineKind, PrefixMode, ScanRequest, ScanStatus, ThreatList, Whitelist,
};
use adsweep_detect::DotfileHidden;
use adsweep_scan::Scanner;

fn threats() -> ThreatList {
    ThreatList::new(["evil.exe", ".lurker.exe"]).unwrap()
}

fn nowhere_whitelist() -> Whitelist {
    Whitelist::new(["/nonexistent-whitelist-prefix"], PrefixMode::Segment).unwrap()
}

fn whitelist_for(path: &Path) -> Whitelist {
    Whitelist::new([path.to_string_lossy().into_owned()], PrefixMode::Segment).unwrap()
}

/// root/
///   a/.lurker.exe   hidden threat
///   a/evil.exe      visible threat
///   b/evil.exe      threat under whitelisted dir
///   c/readme.txt    benign
fn fixture() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    fs::create_dir(root.join("a")).unwrap();
    fs::create_dir(root.join("b")).unwrap();
    fs::create_dir(root.join("c")).unwrap();
    fs::write(root.join("a/.lurker.exe"), b"x").unwrap();
    fs::write(root.join("a/evil.exe"), b"x").unwrap();
    fs::write(root.join("b/evil.exe"), b"x").unwrap();
    fs::write(root.join("c/readme.txt"), b"hello").unwrap();

    temp
}

fn scanner_for(whitelist: Whitelist) -> Scanner {
    // Dotfile detection keeps hidden-mode behavior testable on any host.
    Scanner::with_detector(threats(), whitelist, Box::new(DotfileHidden))
}

#[test]
fn test_end_to_end_hidden_only() {
    let temp = fixture();
    let root = temp.path();

    let scanner = scanner_for(whitelist_for(&root.join("b")));
    let mut request = ScanRequest::new([root]);
    request.only_hidden = true;

    let report = scanner.run(&request).unwrap();
    let text = report.to_text();
    let lines: Vec<&str> = text.lines().collect();

    // One finding: the hidden threat.
    let findings: Vec<_> = report.findings().collect();
    assert_eq!(findings.len(), 1);
    assert_eq!(
        findings[0].path.as_deref(),
        Some(root.join("a/.lurker.exe").as_path())
    );

    // The visible threat is filtered by hidden-only mode.
    assert!(!report.mentions(&root.join("a/evil.exe")));

    // Exactly one skip notice for the whitelisted dir; nothing beneath it.
    let skips: Vec<_> = report.skips().collect();
    assert_eq!(skips.len(), 1);
    assert_eq!(skips[0].path.as_deref(), Some(root.join("b").as_path()));
    assert!(!report.mentions(&root.join("b/evil.exe")));

    // Benign files produce no line.
    assert!(!report.mentions(&root.join("c/readme.txt")));

    assert_eq!(lines.first().copied(), Some(format!("Scanning directory: {}", root.display()).as_str()));
    assert_eq!(lines.last().copied(), Some("Scan complete."));
    assert!(report.is_complete());
}

#[test]
fn test_hidden_only_gates_findings() {
    let temp = fixture();
    let root = temp.path();

    let scanner = scanner_for(nowhere_whitelist());

    let mut hidden_only = ScanRequest::new([root]);
    hidden_only.only_hidden = true;
    let report = scanner.run(&hidden_only).unwrap();
    assert!(!report.mentions(&root.join("a/evil.exe")));

    let everything = ScanRequest::new([root]);
    let report = scanner.run(&everything).unwrap();
    assert!(report.mentions(&root.join("a/evil.exe")));
    // b is not whitelisted here, so its threat is found too.
    assert_eq!(report.stats.findings, 3);
}

#[test]
fn test_walk_is_idempotent() {
    let temp = fixture();
    let root = temp.path();

    let scanner = scanner_for(whitelist_for(&root.join("b")));
    let request = ScanRequest::new([root]);

    let first = scanner.run(&request).unwrap();
    let second = scanner.run(&request).unwrap();
    assert_eq!(first.to_text(), second.to_text());
    assert_eq!(first.stats, second.stats);
}

#[test]
fn test_whitelist_short_circuits_descent() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("safe/nested")).unwrap();
    fs::write(root.join("safe/evil.exe"), b"x").unwrap();
    fs::write(root.join("safe/nested/evil.exe"), b"x").unwrap();

    let scanner = scanner_for(whitelist_for(&root.join("safe")));
    let report = scanner.run(&ScanRequest::new([root])).unwrap();

    assert_eq!(report.stats.skips, 1);
    assert_eq!(report.stats.findings, 0);
    assert!(!report.mentions(&root.join("safe/nested")));
}

#[test]
fn test_error_resilience_across_roots() {
    let temp = fixture();
    let root = temp.path();
    let missing = root.join("no-such-dir");

    let scanner = scanner_for(nowhere_whitelist());
    let request = ScanRequest::new([missing.as_path(), root]);
    let report = scanner.run(&request).unwrap();

    // The inaccessible root produced an error line...
    assert!(report.stats.errors >= 1);
    // ...and findings from the later root are still present.
    assert!(report.mentions(&root.join("a/evil.exe")));
    assert!(report.is_complete());

    // Error lines precede the second root's findings.
    let error_idx = report
        .lines
        .iter()
        .position(|l| l.kind == LineKind::Error)
        .unwrap();
    let finding_idx = report
        .lines
        .iter()
        .position(|l| l.kind == LineKind::Finding)
        .unwrap();
    assert!(error_idx < finding_idx);
}

#[cfg(unix)]
#[test]
fn test_unreadable_subtree_yields_error_and_keeps_findings() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir(root.join("a")).unwrap();
    fs::write(root.join("a/secret.txt"), b"x").unwrap();
    fs::create_dir(root.join("c")).unwrap();
    fs::write(root.join("c/evil.exe"), b"x").unwrap();

    fs::set_permissions(root.join("a"), fs::Permissions::from_mode(0o000)).unwrap();
    // Privileged users can open the directory regardless; nothing to observe.
    if fs::read_dir(root.join("a")).is_ok() {
        fs::set_permissions(root.join("a"), fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let scanner = scanner_for(nowhere_whitelist());
    let report = scanner.run(&ScanRequest::new([root])).unwrap();

    fs::set_permissions(root.join("a"), fs::Permissions::from_mode(0o755)).unwrap();

    // The unreadable directory is an error line, not a silent gap...
    assert!(report.stats.errors >= 1);
    assert!(
        report
            .errors()
            .any(|line| line.path.as_deref() == Some(root.join("a").as_path()))
    );
    // ...and the sibling finding is still reported afterwards.
    assert!(report.mentions(&root.join("c/evil.exe")));
    assert!(report.is_complete());
}

#[test]
fn test_progress_broadcasts_track_visited_entries() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    for i in 0..300 {
        fs::write(root.join(format!("file{i:03}.txt")), b"x").unwrap();
    }

    let scanner = scanner_for(nowhere_whitelist());
    let mut progress_rx = scanner.subscribe();

    // Hidden-only over a fully visible tree: every entry is filtered out
    // of evaluation, but progress must still advance per visited entry.
    let mut request = ScanRequest::new([root]);
    request.only_hidden = true;
    scanner.run(&request).unwrap();

    // A mid-walk broadcast names the entry being visited; the final
    // snapshot names the root.
    let mut mid_walk = false;
    while let Ok(progress) = progress_rx.try_recv() {
        if progress.current_path != root {
            mid_walk = true;
        }
    }
    assert!(mid_walk);
}

#[test]
fn test_parallel_roots_match_sequential_output() {
    let temp_a = fixture();
    let temp_b = fixture();

    let scanner = scanner_for(nowhere_whitelist());

    let mut sequential = ScanRequest::new([temp_a.path(), temp_b.path()]);
    sequential.threads = 2;
    let mut parallel = sequential.clone();
    parallel.parallel_roots = true;

    let seq_report = scanner.run(&sequential).unwrap();
    let par_report = scanner.run(&parallel).unwrap();

    assert_eq!(seq_report.to_text(), par_report.to_text());
    assert_eq!(seq_report.stats, par_report.stats);
}

#[test]
fn test_cancelled_scan_returns_partial_report() {
    let temp = fixture();

    let scanner = scanner_for(nowhere_whitelist());
    scanner.cancel();

    let report = scanner.run(&ScanRequest::new([temp.path()])).unwrap();
    assert_eq!(report.status, ScanStatus::Cancelled);
    assert!(!report.to_text().contains("Scan complete."));
}

#[test]
fn test_max_depth_limits_evaluation() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("deep/deeper")).unwrap();
    fs::write(root.join("evil.exe"), b"x").unwrap();
    fs::write(root.join("deep/deeper/evil.exe"), b"x").unwrap();

    let scanner = scanner_for(nowhere_whitelist());
    let mut request = ScanRequest::new([root]);
    request.max_depth = Some(1);

    let report = scanner.run(&request).unwrap();
    assert!(report.mentions(&root.join("evil.exe")));
    assert!(!report.mentions(&root.join("deep/deeper/evil.exe")));
}

#[tokio::test]
async fn test_spawned_scan_and_progress() {
    let temp = fixture();
    let root = temp.path().to_path_buf();

    let scanner = scanner_for(nowhere_whitelist());
    let mut progress_rx = scanner.subscribe();

    let report = scanner
        .spawn(ScanRequest::new([root]))
        .await
        .unwrap()
        .unwrap();
    assert!(report.is_complete());
    assert_eq!(report.stats.findings, 3);

    // Each walk broadcasts at least a final snapshot.
    let progress = progress_rx.try_recv().unwrap();
    assert!(progress.total_items() >= 1);
}
