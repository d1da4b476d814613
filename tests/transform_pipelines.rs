//! Transform pipelines writing into the layout the chunk corpus reads.

use std::fs;

use serde_json::Value;

use unmess_design_mcp::artifacts::{ArtifactLayout, ChunkCorpus, ChunkFormat};
use unmess_design_mcp::transform::{self, Pipeline, TransformError};

const CARD_SPEC: &str = "---\nname: Card\nstatus: 'stable'\n---\n\n# Card\nGroups content.\n## Props\n- elevated\n# Accessibility\nUse headings inside.\n";

fn design_root() -> (tempfile::TempDir, ArtifactLayout) {
    let dir = tempfile::tempdir().unwrap();
    let layout = ArtifactLayout::from_root(dir.path());
    fs::create_dir_all(&layout.specs_dir).unwrap();
    fs::create_dir_all(&layout.tokens_dir).unwrap();
    fs::write(layout.specs_dir.join("Card.md"), CARD_SPEC).unwrap();
    fs::write(
        layout.tokens_dir.join("spacing.json"),
        r#"{"$schema": "x", "space": {"sm": {"$value": "8px"}, "md": "16px"}}"#,
    )
    .unwrap();
    (dir, layout)
}

#[tokio::test]
async fn every_pipeline_feeds_the_corpus() {
    let (_dir, layout) = design_root();

    for pipeline in Pipeline::ALL {
        let report =
            transform::run(pipeline, &layout.specs_dir, &layout.tokens_dir, &layout.corpus_dir)
                .unwrap();
        assert_eq!(report.components.len(), 1, "{pipeline}");
        assert_eq!(report.tokens.len(), 1, "{pipeline}");
    }

    let corpus = ChunkCorpus::new(&layout.specs_dir, &layout.corpus_dir);

    let toon = corpus.load("Card", ChunkFormat::ToonMd).await.unwrap();
    assert!(toon.starts_with("+++\nname: \"Card\"\nstatus: \"stable\"\n+++\n"));

    let pure = corpus.load("Card", ChunkFormat::RawMd).await.unwrap();
    assert!(pure.starts_with("# Card"));
    assert!(pure.ends_with("Use headings inside."));

    let mono = corpus.load("Card", ChunkFormat::MonoJson).await.unwrap();
    let parsed: Value = serde_json::from_str(&mono).unwrap();
    assert_eq!(parsed["raw_content"], CARD_SPEC);
    assert_eq!(
        parsed["sections"]["Card"],
        "Groups content.\n## Props\n- elevated"
    );
    assert_eq!(parsed["sections"]["Accessibility"], "Use headings inside.");
}

#[test]
fn token_outputs_per_pipeline() {
    let (_dir, layout) = design_root();
    let out = layout.corpus_dir.clone();

    transform::run(Pipeline::PureMd, &layout.specs_dir, &layout.tokens_dir, &out).unwrap();
    let table = fs::read_to_string(out.join("test-3-pure-md/tokens/spacing.md")).unwrap();
    assert_eq!(
        table,
        "# spacing Tokens\n\n| Token | Value |\n|-------|-------|\n| `space.sm` | `8px` |\n| `space.md` | `16px` |\n"
    );

    transform::run(Pipeline::MonoJson, &layout.specs_dir, &layout.tokens_dir, &out).unwrap();
    let copied = fs::read_to_string(out.join("test-4-mono-json/tokens/spacing.json")).unwrap();
    assert_eq!(
        copied,
        fs::read_to_string(layout.tokens_dir.join("spacing.json")).unwrap()
    );

    transform::run(Pipeline::ToonMd, &layout.specs_dir, &layout.tokens_dir, &out).unwrap();
    assert!(out.join("test-2-toon-md/tokens/spacing.toon").is_file());
}

#[test]
fn missing_specs_directory_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let layout = ArtifactLayout::from_root(dir.path());

    let err = transform::run(
        Pipeline::ToonMd,
        &layout.specs_dir,
        &layout.tokens_dir,
        &layout.corpus_dir,
    )
    .unwrap_err();
    assert!(matches!(err, TransformError::InputMissing { .. }));
    assert!(!layout.corpus_dir.exists());
}
