mod common;

use std::path::PathBuf;

use common::{record, FakeSource, UnreachableSource};
use kb_export_core::{Article, Author, ExportedDocument};
use kb_export_engine::{build_markdown_document, compose, render_frontmatter, resolve_author};
use pretty_assertions::assert_eq;
use serde_json::json;

fn full_article() -> Article {
    Article {
        sys_id: "a1".into(),
        short_description: Some("Leave   Policy".into()),
        title: Some("ignored".into()),
        html_body: "<p>x</p>".into(),
        author_ref: Some("u1".into()),
        created_at: Some("2024-01-01 10:00:00".into()),
        updated_at: Some("2024-02-01 10:00:00".into()),
        view_count: Some("42".into()),
        rating: Some(" 4.5 ".into()),
        knowledge_base_title: Some("HR".into()),
        category_label: Some("Policies".into()),
        category_sys_id: Some("c1".into()),
    }
}

#[test]
fn compose_orders_every_field() {
    let author = Author {
        name: "Ada Lovelace".into(),
        sys_id: "u1".into(),
    };
    let fm = compose(&full_article(), &author);
    assert_eq!(
        fm.keys(),
        vec![
            "title",
            "author",
            "author_sys_id",
            "created_date",
            "updated_date",
            "views",
            "rating",
            "knowledge_base",
            "category",
            "sys_id"
        ]
    );
    assert_eq!(fm.get("title"), Some("Leave Policy"));
    assert_eq!(fm.get("rating"), Some("4.5"));
}

#[test]
fn compose_omits_empty_sources_but_keeps_title() {
    let article = Article {
        sys_id: "a2".into(),
        ..Article::default()
    };
    let fm = compose(&article, &Author::unknown(""));
    assert_eq!(fm.keys(), vec!["title", "author", "sys_id"]);
    assert_eq!(fm.get("title"), Some("Unnamed Article a2"));
    assert_eq!(fm.get("author"), Some("Unknown"));
}

#[test]
fn frontmatter_renders_quoted_lines() {
    let article = Article {
        sys_id: "a3".into(),
        title: Some(r#"Say "hi""#.into()),
        ..Article::default()
    };
    let fm = compose(&article, &Author::unknown(""));
    assert_eq!(
        render_frontmatter(&fm),
        "---\ntitle: \"Say \"hi\"\"\nauthor: \"Unknown\"\nsys_id: \"a3\"\n---"
    );
}

#[test]
fn document_has_frontmatter_heading_and_trimmed_body() {
    let article = Article {
        sys_id: "a4".into(),
        title: Some("Doc".into()),
        ..Article::default()
    };
    let doc = ExportedDocument {
        destination: PathBuf::from("out/Doc.md"),
        title: "Doc".into(),
        frontmatter: compose(&article, &Author::unknown("")),
        body: "\n  Body text\n\n".into(),
    };
    assert_eq!(
        build_markdown_document(&doc),
        "---\ntitle: \"Doc\"\nauthor: \"Unknown\"\nsys_id: \"a4\"\n---\n\n# Doc\n\nBody text"
    );
}

#[tokio::test]
async fn author_is_resolved_from_user_record() {
    let source = FakeSource::new().with_user("u1", "Ada", "Lovelace");
    let author = resolve_author(&source, Some("u1")).await;
    assert_eq!(author.name, "Ada Lovelace");
    assert_eq!(author.sys_id, "u1");
}

#[tokio::test]
async fn author_lookup_never_fails() {
    let source = FakeSource::new().with_user("blank", "", "");

    let missing_ref = resolve_author(&source, None).await;
    assert_eq!(missing_ref, Author::unknown(""));

    let unknown_user = resolve_author(&source, Some("ghost")).await;
    assert_eq!(unknown_user, Author::unknown("ghost"));

    let nameless = resolve_author(&source, Some("blank")).await;
    assert_eq!(nameless, Author::unknown("blank"));

    let unreachable = resolve_author(&UnreachableSource, Some("u9")).await;
    assert_eq!(unreachable, Author::unknown("u9"));
}

#[test]
fn record_reads_references_and_numbers() {
    let rec = record(json!({
        "sys_id": "a5",
        "short_description": "Title",
        "text": "<p>Body</p>",
        "author": { "link": "https://x/api/now/table/sys_user/u1", "value": "u1" },
        "kb_category": "c1",
        "view_count": 7,
        "rating": "",
        "kb_knowledge_base.title": "HR"
    }));
    let article = rec.article("listed");
    assert_eq!(article.sys_id, "a5");
    assert_eq!(article.author_ref.as_deref(), Some("u1"));
    assert_eq!(article.category_sys_id.as_deref(), Some("c1"));
    assert_eq!(article.view_count.as_deref(), Some("7"));
    assert_eq!(article.rating, None);
    assert_eq!(article.knowledge_base_title.as_deref(), Some("HR"));
    assert_eq!(article.category_label, None);
}

#[test]
fn record_without_id_uses_listed_id() {
    let article = record(json!({ "title": "T" })).article("listed");
    assert_eq!(article.sys_id, "listed");
}
