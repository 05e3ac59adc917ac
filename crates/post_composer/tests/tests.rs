// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use post_composer::{
    html, BlockKind, ComposeSession, ComposerConfig, ComposerModel, Document,
    FormatState, MediaReference, TextUpdate,
};
use speculoos::prelude::*;

fn image(name: &str) -> MediaReference {
    MediaReference::parse_image(&format!("https://cdn.example.com/{name}"))
        .unwrap()
}

/// Block kind of every line, with image lines marked as `None`.
fn shape(document: &Document) -> Vec<Option<BlockKind>> {
    let mut lines = document.lines();
    if lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines
        .iter()
        .map(|line| (!line.is_image()).then_some(line.block))
        .collect()
}

#[test]
fn can_instantiate_a_model_and_call_methods() {
    let mut model = ComposerModel::new();
    model.replace_text("foo");
    model.select(1, 2);

    let update = model.bold();

    if let TextUpdate::ReplaceAll(r) = update.text_update {
        assert_eq!(r.replacement_html, "<p>f<strong>o</strong>o</p>");
        assert_eq!(r.start, 1);
        assert_eq!(r.end, 2);
    } else {
        panic!("Expected to receive a ReplaceAll response");
    }
}

#[test]
fn inserting_text_grows_the_length_by_utf16_units() {
    let mut document = Document::new();
    document
        .insert_text(0, "h\u{e9}llo \u{1F44B}", &FormatState::default())
        .unwrap();
    assert_that(&document.len()).is_equal_to(8);
}

#[test]
fn an_image_counts_as_one_unit_plus_its_line_breaks() {
    let mut document = Document::new();
    document
        .insert_text(0, "abcd", &FormatState::default())
        .unwrap();
    let after = document.insert_image(2, image("a.jpg")).unwrap();
    assert_eq!(document.len(), 4 + 1 + 2);
    assert_eq!(document.text(), "ab\n\u{FFFC}\ncd");
    assert_eq!(after, 5);
}

#[test]
fn newline_after_quoted_text_keeps_the_quote_and_resets_the_next_line() {
    let mut model = ComposerModel::new();
    model.quote();
    model.replace_text("Something wise");
    model.enter();
    assert_eq!(
        shape(model.document()),
        vec![Some(BlockKind::Quote)]
    );
    let lines = model.document().lines();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1].block, BlockKind::Normal);
    assert_eq!(model.format_state().block(), BlockKind::Normal);
    assert!(!model.format_state().italic());
}

#[test]
fn newline_straight_after_quote_exits_without_growing() {
    let mut model = ComposerModel::new();
    model.replace_text("Dear diary\n");
    let before = model.text_len();
    model.quote();
    model.enter();
    assert_eq!(model.text_len(), before);
    assert_eq!(model.format_state().block(), BlockKind::Normal);
}

#[test]
fn image_mid_line_breaks_out_of_the_quote() {
    let mut model = ComposerModel::new();
    model.quote();
    model.replace_text("abcd");
    model.select(2, 2);
    model.insert_image(image("a.jpg"));
    assert_eq!(model.get_content_as_plain_text(), "ab\n\u{FFFC}\ncd");
    assert_eq!(
        shape(model.document()),
        vec![Some(BlockKind::Quote), None, Some(BlockKind::Quote)]
    );
    assert_eq!(
        model.get_content_as_html(),
        concat!(
            "<blockquote><em>ab</em></blockquote>",
            r#"<p><img src="https://cdn.example.com/a.jpg" /></p>"#,
            "<blockquote><em>cd</em></blockquote>"
        )
    );
}

#[test]
fn same_style_runs_serialize_into_one_paragraph() {
    let mut model = ComposerModel::new();
    model.replace_text("Hello ");
    model.replace_text("world");
    assert_eq!(model.get_content_as_html(), "<p>Hello world</p>");
}

#[test]
fn text_is_escaped_in_order() {
    let mut model = ComposerModel::new();
    model.replace_text("<script>&</script>");
    assert_eq!(
        model.get_content_as_html(),
        "<p>&lt;script&gt;&amp;&lt;/script&gt;</p>"
    );
}

#[test]
fn serializing_then_parsing_preserves_block_structure() {
    let mut model = ComposerModel::new();
    model.replace_text("Dear diary\n");
    model.quote();
    model.replace_text("Something wise");
    model.enter();
    model.bullet_list();
    model.replace_text("milk");
    model.enter();
    model.replace_text("eggs");
    model.enter();
    model.enter();
    model.insert_image(image("a.jpg"));
    model.replace_text("The end");

    let post = model.serialize();
    let parsed = html::parse(&post.html).unwrap();

    assert_eq!(shape(&parsed), shape(model.document()));
    assert_eq!(
        shape(&parsed),
        vec![
            Some(BlockKind::Normal),
            Some(BlockKind::Quote),
            Some(BlockKind::BulletItem),
            Some(BlockKind::BulletItem),
            None,
            Some(BlockKind::Normal),
        ]
    );
    assert_eq!(
        html::serialize(&parsed, &ComposerConfig::default()),
        post
    );
}

#[test]
fn merged_lists_round_trip_too() {
    let config = ComposerConfig {
        merge_adjacent_list_items: true,
        ..ComposerConfig::default()
    };
    let mut model = ComposerModel::with_config(config.clone());
    model.bullet_list();
    model.replace_text("milk");
    model.enter();
    model.replace_text("eggs");
    let body = model.get_content_as_html();
    assert_eq!(body, "<ul><li>milk</li><li>eggs</li></ul>");
    let parsed = html::parse(&body).unwrap();
    assert_eq!(html::serialize(&parsed, &config).html, body);
}

#[test]
fn editing_an_existing_post() {
    let mut model = ComposerModel::from_html(concat!(
        "<p>Dear diary</p>",
        "<blockquote><em>Something wise</em></blockquote>"
    ))
    .unwrap();
    model.select(10, 10);
    model.replace_text(", hello");
    assert_eq!(
        model.get_content_as_html(),
        concat!(
            "<p>Dear diary, hello</p>",
            "<blockquote><em>Something wise</em></blockquote>"
        )
    );
}

#[test]
fn a_whole_compose_session() {
    let mut session = ComposeSession::default();
    session.set_title("Monday");
    session.composer_mut().replace_text("Woke up early");
    let first = session.begin_image_load();
    let second = session.begin_image_load();
    session.finish_image_load(&second, image("b.jpg")).unwrap();
    session.finish_image_load(&first, image("a.jpg")).unwrap();

    let submission = session.submit();
    assert_eq!(
        submission.media_urls,
        vec![
            "https://cdn.example.com/b.jpg",
            "https://cdn.example.com/a.jpg"
        ]
    );
    assert!(submission.html_body.starts_with("<p>Woke up early</p>"));
}
