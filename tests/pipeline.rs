use paradiff::ReconcileError;
use paradiff::diff::{DiffType, compare_files, compare_texts};
use paradiff::normalize::{NormalizeOptions, extract_paragraph_mappings};
use paradiff::replace::{
    AnchorPosition, InstructionKind, ReplacementInstruction, ReplacementMap,
    apply_replacements_to_file,
};
use paradiff::session::Session;
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

struct Workspace {
    dir: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = std::env::temp_dir().join(format!("paradiff_test_{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        Self { dir }
    }

    fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.dir);
    }
}

const SOURCE: &str = "# Chapter\n\nThe opening paragraph\nwraps over two lines.\n\n消失段落\n\nThe end.\n";
const TARGET: &str = "# Chapter\n\nThe opening paragraph wraps over two lines.\n\nThe end.\n\n新增内容\n";

#[test]
fn reformatting_alone_is_not_a_change() {
    let comparison = compare_texts(SOURCE, TARGET, NormalizeOptions::default());
    let diffs = &comparison.diffs;

    assert_eq!(diffs.summary.total, diffs.entries.len());
    assert!(
        diffs
            .entries
            .iter()
            .filter(|e| e.diff_type != DiffType::Unchanged)
            .all(|e| !e.content.contains("opening"))
    );
    assert_eq!(diffs.summary.removed, 1);
    assert_eq!(diffs.summary.added, 1);
    assert_eq!(diffs.entries[0].content, "# Chapter");
    assert_eq!(diffs.entries[2].content, "消失段落");
    assert_eq!(diffs.entries[2].line_number, 3);
}

#[test]
fn accepting_everything_restores_source_content() {
    let workspace = Workspace::new();
    let source = workspace.file("source.md", SOURCE);
    let target = workspace.file("target.md", TARGET);

    let comparison = compare_files(&source, &target, NormalizeOptions::default()).unwrap();
    let mut session = Session::new(comparison);
    session.accept_all().unwrap();
    let written = session.save(&source, &target).unwrap();

    assert_eq!(fs::read_to_string(&target).unwrap(), written);
    // the reformatted paragraph stays as the rewrite has it
    assert_eq!(
        written,
        "# Chapter\n\nThe opening paragraph wraps over two lines.\n\n消失段落\n\nThe end.\n"
    );
}

#[test]
fn skipped_entries_leave_target_untouched() {
    let workspace = Workspace::new();
    let source = workspace.file("source.md", SOURCE);
    let target = workspace.file("target.md", TARGET);

    let comparison = compare_files(&source, &target, NormalizeOptions::default()).unwrap();
    let mut session = Session::new(comparison);
    while session.skip() {}

    assert!(session.replacements().is_empty());
    assert_eq!(session.save(&source, &target).unwrap(), TARGET);
    assert_eq!(fs::read_to_string(&target).unwrap(), TARGET);
}

#[test]
fn undo_drops_the_decision_before_saving() {
    let workspace = Workspace::new();
    let source = workspace.file("source.md", SOURCE);
    let target = workspace.file("target.md", TARGET);

    let comparison = compare_files(&source, &target, NormalizeOptions::default()).unwrap();
    let mut session = Session::new(comparison);
    session.accept().unwrap();
    session.accept().unwrap();
    assert!(session.is_complete());

    let undone = session.undo().unwrap();
    assert_eq!(undone.entry_index, 1);

    assert_eq!(undone.entry.kind, InstructionKind::Added);
    assert_eq!(undone.entry.formatted, "新增内容");
    assert_eq!(session.replacements().len(), 1);

    let written = session.save(&source, &target).unwrap();
    assert_eq!(
        written,
        "# Chapter\n\nThe opening paragraph wraps over two lines.\n\n消失段落\n\nThe end.\n\n新增内容\n"
    );
}

#[test]
fn either_anchor_side_restores_source_order() {
    let source = "Alpha one.\n\nBeta two!\n\nGamma three.\n\nDelta four?\n";
    let target = "Alpha one.\n\nGamma three.\n";
    for position in [AnchorPosition::After, AnchorPosition::Before] {
        let comparison = compare_texts(source, target, NormalizeOptions::default());
        let mut session = Session::new(comparison).with_anchor_position(position);
        session.accept_all().unwrap();

        let reconciled = session.apply().unwrap();
        assert_eq!(reconciled, source, "{:?}", position);
        assert_eq!(
            extract_paragraph_mappings(&reconciled),
            extract_paragraph_mappings(source),
            "{:?}",
            position
        );
    }
}

#[test]
fn hand_written_payloads_replay_on_files() {
    let workspace = Workspace::new();
    let source = workspace.file("source.md", "Head\nlost line\nTail\n");
    let target = workspace.file("target.md", "Head\nextra\nTail\n");

    let mut map = ReplacementMap::new();
    map.insert(
        "added:1",
        ReplacementInstruction {
            kind: InstructionKind::Added,
            snippet: "extra".to_string(),
            anchor: Some("Head".to_string()),
            anchor_position: AnchorPosition::After,
        }
        .to_payload()
        .unwrap(),
    );
    map.insert("removed:2", r#"{"type":"removed","snippet":"","anchor":"Head"}"#);

    let written = apply_replacements_to_file(&source, &target, &map).unwrap();
    assert_eq!(written, "Head\nlost line\nTail\n");
    assert_eq!(fs::read_to_string(&target).unwrap(), written);
}

#[test]
fn malformed_payload_leaves_file_alone() {
    let workspace = Workspace::new();
    let source = workspace.file("source.md", "A\n");
    let target = workspace.file("target.md", "A\nB\n");

    let mut map = ReplacementMap::new();
    map.insert("added:1", r#"{"type":"added","snippet":"B"}"#);
    map.insert("removed:0", r#"{"snippet":"A"}"#);

    let err = apply_replacements_to_file(&source, &target, &map).unwrap_err();
    assert!(matches!(err, ReconcileError::Instruction { ref key, .. } if key == "removed:0"));
    assert_eq!(fs::read_to_string(&target).unwrap(), "A\nB\n");
}

#[test]
fn missing_files_report_their_path() {
    let workspace = Workspace::new();
    let source = workspace.file("source.md", "A");
    let missing = workspace.dir.join("missing.md");

    match compare_files(&source, &missing, NormalizeOptions::default()) {
        Err(ReconcileError::Io { path, .. }) => assert_eq!(path, missing),
        other => panic!("expected an I/O error, got {:?}", other.map(|c| c.diffs.summary)),
    }
}
