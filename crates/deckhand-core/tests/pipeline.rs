//! Integration tests for the generation pipeline against a fake renderer.

#![cfg(unix)]

mod common;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use deckhand_core::{
    Content, DeckService, GenerateParams, Invocation, OutputFormat, Renderer, RendererCommand,
    Theme, ToolResult, WorkRoot,
};
use tempfile::TempDir;

use common::{Mode, service};

fn deck(slides: usize, title: &str) -> String {
    (1..=slides)
        .map(|i| format!("# {title} {i}"))
        .collect::<Vec<_>>()
        .join("\n---\n")
}

fn decoded_images(result: &ToolResult) -> Vec<String> {
    result
        .content
        .iter()
        .filter_map(|part| match part {
            Content::Image { data, .. } => {
                Some(String::from_utf8(STANDARD.decode(data).unwrap()).unwrap())
            }
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_images_come_back_in_numeric_order() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let service = service(temp.path(), Mode::Ok);

    let result = service
        .generate(GenerateParams::new(deck(12, "Slide"), Theme::Seriph), OutputFormat::Images)
        .await;

    assert!(!result.is_error, "unexpected error: {result:?}");
    let images = decoded_images(&result);
    assert_eq!(images.len(), 12);
    for (index, image) in images.iter().enumerate() {
        let first_line = image.lines().next().unwrap();
        assert_eq!(first_line, format!("slide {} theme seriph", index + 1));
    }
    // Identifier and parameters lead the image parts.
    assert_eq!(result.content.len(), 14);
    assert!(result.content[..2].iter().all(|c| c.as_text().is_some()));
    assert!(result.content[2..].iter().all(Content::is_image));
}

#[tokio::test]
async fn test_documents_match_renderer_output_bytes() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let service = service(temp.path(), Mode::Ok);

    for format in [OutputFormat::Pdf, OutputFormat::Pptx] {
        let rendered = service
            .run(Invocation::new(
                GenerateParams::new(deck(3, "Doc"), Theme::Default),
                format,
            ))
            .await
            .expect("Failed to render");

        assert_eq!(rendered.result.content.len(), 1);
        let resource = rendered.result.resource().expect("resource part");
        assert_eq!(resource.mime_type, format.mime_type());
        assert_eq!(
            resource.uri,
            format!("file:///{}/{}", rendered.dir.id(), format.output_target())
        );

        let on_disk = std::fs::read(rendered.dir.join(format.output_target())).unwrap();
        let payload = STANDARD.decode(resource.blob.as_deref().unwrap()).unwrap();
        assert_eq!(payload, on_disk);
    }
}

#[tokio::test]
async fn test_concurrent_invocations_are_isolated() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let service = service(temp.path(), Mode::Ok);

    let (alpha, beta) = tokio::join!(
        service.generate(GenerateParams::new(deck(2, "Alpha"), Theme::Bricks), OutputFormat::Images),
        service.generate(GenerateParams::new(deck(3, "Beta"), Theme::Bricks), OutputFormat::Images),
    );

    let alpha_images = decoded_images(&alpha);
    let beta_images = decoded_images(&beta);
    assert_eq!(alpha_images.len(), 2);
    assert_eq!(beta_images.len(), 3);
    assert!(alpha_images.iter().all(|i| i.contains("Alpha") && !i.contains("Beta")));
    assert!(beta_images.iter().all(|i| i.contains("Beta") && !i.contains("Alpha")));

    let alpha_meta = alpha.generation_meta().unwrap();
    let beta_meta = beta.generation_meta().unwrap();
    assert_ne!(alpha_meta.execution_id, beta_meta.execution_id);
}

#[tokio::test]
async fn test_renderer_failure_is_a_single_text_part() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let service = service(temp.path(), Mode::Fail);

    for format in [OutputFormat::Images, OutputFormat::Pdf, OutputFormat::Pptx] {
        let result = service
            .generate(GenerateParams::new("# Title", Theme::Shibainu), format)
            .await;

        assert!(result.is_error);
        assert_eq!(result.content.len(), 1);
        let message = result.content[0].as_text().expect("text part");
        assert!(message.starts_with("render_error: "), "{message}");
        assert!(message.contains("status 3"), "{message}");
        assert!(message.contains("cannot load theme shibainu"), "{message}");
    }
}

#[tokio::test]
async fn test_repeated_calls_are_not_cached() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let service = service(temp.path(), Mode::Ok);
    let params = GenerateParams::new(deck(2, "Same"), Theme::AppleBasic);

    let first = service.generate(params.clone(), OutputFormat::Images).await;
    let second = service.generate(params.clone(), OutputFormat::Images).await;

    let first_meta = first.generation_meta().unwrap();
    let second_meta = second.generation_meta().unwrap();
    assert_ne!(first_meta.execution_id, second_meta.execution_id);
    assert_eq!(first_meta.params, params);
    assert_eq!(second_meta.params, params);
    assert_eq!(decoded_images(&first), decoded_images(&second));

    let runs = std::fs::read_dir(temp.path().join("runs")).unwrap().count();
    assert_eq!(runs, 2);
}

#[tokio::test]
async fn test_missing_output_is_distinguished() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let service = service(temp.path(), Mode::Silent);

    for format in [OutputFormat::Images, OutputFormat::Pdf] {
        let result = service
            .generate(GenerateParams::new("# Title", Theme::Default), format)
            .await;
        assert!(result.is_error);
        let message = result.content[0].as_text().unwrap();
        assert!(message.starts_with("missing_output_error: "), "{message}");
        assert!(!message.contains(&temp.path().display().to_string()), "{message}");
    }
}

#[tokio::test]
async fn test_staging_failure_is_a_structured_response() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let blocker = temp.path().join("runs");
    std::fs::write(&blocker, "not a directory").unwrap();
    let service = service(temp.path(), Mode::Ok);

    let result = service
        .generate(GenerateParams::new("# Title", Theme::Default), OutputFormat::Pdf)
        .await;

    assert!(result.is_error);
    assert_eq!(result.content.len(), 1);
    let message = result.content[0].as_text().unwrap();
    assert!(message.starts_with("staging_error: "), "{message}");
    assert!(!message.contains(&temp.path().display().to_string()), "{message}");
}

#[tokio::test]
async fn test_empty_text_is_rejected_before_staging() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let service = service(temp.path(), Mode::Ok);

    let result = service
        .generate(GenerateParams::new("  \n", Theme::Default), OutputFormat::Images)
        .await;

    assert!(result.is_error);
    assert!(result.content[0].as_text().unwrap().starts_with("invalid_input: "));
    assert!(!temp.path().join("runs").exists());
}

#[tokio::test]
async fn test_unstartable_renderer() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let service = DeckService::new(
        WorkRoot::new(temp.path()),
        Renderer::new(RendererCommand::new(
            "/nonexistent/deckhand-renderer",
            Vec::<String>::new(),
        )),
    );

    let result = service
        .generate(GenerateParams::new("# Title", Theme::Default), OutputFormat::Images)
        .await;

    assert!(result.is_error);
    let message = result.content[0].as_text().unwrap();
    assert!(message.starts_with("render_error: failed to start renderer"), "{message}");
}
