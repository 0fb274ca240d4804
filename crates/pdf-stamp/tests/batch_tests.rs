use lopdf::{Dictionary, Document, Object, Stream};
use pdf_stamp::*;
use std::path::Path;
use tempfile::TempDir;

fn create_test_pdf(num_pages: usize) -> Document {
    let mut doc = Document::with_version("1.7");

    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for _ in 0..num_pages {
        let content_id = doc.add_object(Stream::new(Dictionary::new(), b"q Q".to_vec()));

        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ]),
            ),
            ("Resources", Object::Dictionary(Dictionary::new())),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(num_pages as i64)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));

    doc.trailer.set("Root", catalog_id);

    doc
}

fn save_test_pdf(mut doc: Document, path: &Path) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let mut writer = Vec::new();
    doc.save_to(&mut writer).unwrap();
    std::fs::write(path, writer).unwrap();
}

fn write_signature_png(path: &Path) {
    let mut img = image::RgbaImage::new(200, 100);
    for (x, _y, pixel) in img.enumerate_pixels_mut() {
        *pixel = if x < 150 {
            image::Rgba([0, 0, 255, 200])
        } else {
            image::Rgba([0, 0, 0, 0])
        };
    }
    img.save(path).unwrap();
}

fn test_config(dir: &TempDir) -> StampConfig {
    let signature_path = dir.path().join("sig.png");
    write_signature_png(&signature_path);
    StampConfig::from_options(&StampOptions {
        signature_path,
        ..Default::default()
    })
    .unwrap()
}

async fn load_log(path: &Path) -> SignatureLog {
    let bytes = tokio::fs::read(path).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[test]
fn test_collect_documents_recurses_and_sorts() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input");
    save_test_pdf(create_test_pdf(1), &input.join("b.pdf"));
    save_test_pdf(create_test_pdf(1), &input.join("a.pdf"));
    save_test_pdf(create_test_pdf(1), &input.join("sub/nested.PDF"));
    std::fs::write(input.join("notes.txt"), "not a document").unwrap();

    let documents = collect_documents(&input).unwrap();
    let relative: Vec<_> = documents.iter().map(|(rel, _)| rel.clone()).collect();

    assert_eq!(
        relative,
        vec![
            Path::new("a.pdf").to_path_buf(),
            Path::new("b.pdf").to_path_buf(),
            Path::new("sub/nested.PDF").to_path_buf(),
        ]
    );
    for (_, absolute) in &documents {
        assert!(absolute.exists());
    }
}

#[tokio::test]
async fn test_batch_mirrors_directory_structure() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input");
    let output = dir.path().join("output");
    save_test_pdf(create_test_pdf(2), &input.join("a.pdf"));
    save_test_pdf(create_test_pdf(1), &input.join("sub/b.pdf"));
    save_test_pdf(create_test_pdf(1), &input.join("sub/deeper/c.PDF"));

    let config = test_config(&dir);
    let batch = sign_batch(&input, &output, &config).await.unwrap();

    assert_eq!(batch.total_documents, 3);
    assert_eq!(batch.successful, 3);
    assert_eq!(batch.failed, 0);
    assert!(output.join("a.pdf").exists());
    assert!(output.join("sub/b.pdf").exists());
    assert!(output.join("sub/deeper/c.PDF").exists());
}

#[tokio::test]
async fn test_batch_isolates_corrupt_document() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input");
    let output = dir.path().join("output");
    save_test_pdf(create_test_pdf(1), &input.join("a.pdf"));
    save_test_pdf(create_test_pdf(1), &input.join("b.pdf"));
    save_test_pdf(create_test_pdf(1), &input.join("c.pdf"));
    std::fs::write(input.join("broken.pdf"), b"this is not a pdf").unwrap();

    let config = test_config(&dir);
    let batch = sign_batch(&input, &output, &config).await.unwrap();

    assert_eq!(batch.total_documents, 4);
    assert_eq!(batch.successful, 3);
    assert_eq!(batch.failed, 1);

    let failure = batch.files.iter().find(|f| !f.success).unwrap();
    assert!(failure.input_path.ends_with("broken.pdf"));
    assert!(failure.error.is_some());

    // Only successes are logged
    let log = load_log(&batch.log_path).await;
    assert_eq!(log.signed_files.len(), 3);
    assert!(log.signed_files.iter().all(|entry| entry.success));
}

#[tokio::test]
async fn test_log_entries_accumulate_across_runs() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input");
    let output = dir.path().join("output");
    save_test_pdf(create_test_pdf(1), &input.join("a.pdf"));
    save_test_pdf(create_test_pdf(1), &input.join("b.pdf"));

    let config = test_config(&dir);
    let first = sign_batch(&input, &output, &config).await.unwrap();
    assert_eq!(load_log(&first.log_path).await.signed_files.len(), 2);

    let second = sign_batch(&input, &output, &config).await.unwrap();
    assert_eq!(second.successful, 2);

    // Prior entries are never discarded
    let log = load_log(&second.log_path).await;
    assert_eq!(log.signed_files.len(), 4);
}

#[tokio::test]
async fn test_corrupt_log_starts_fresh() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input");
    let output = dir.path().join("output");
    save_test_pdf(create_test_pdf(1), &input.join("a.pdf"));

    std::fs::create_dir_all(&output).unwrap();
    std::fs::write(output.join(LOG_FILE_NAME), b"{ not json").unwrap();

    let config = test_config(&dir);
    let batch = sign_batch(&input, &output, &config).await.unwrap();

    assert!(batch.log_error.is_none());
    let log = load_log(&batch.log_path).await;
    assert_eq!(log.signed_files.len(), 1);
}

#[tokio::test]
async fn test_log_entry_snapshot_uses_inches() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input");
    let output = dir.path().join("output");
    save_test_pdf(create_test_pdf(3), &input.join("a.pdf"));

    let signature_path = dir.path().join("sig.png");
    write_signature_png(&signature_path);
    let config = StampConfig::from_options(&StampOptions {
        signature_path: signature_path.clone(),
        scale: 0.25,
        x_offset_in: 1.0,
        y_offset_in: 0.5,
        pages: "1-2".to_string(),
        ..Default::default()
    })
    .unwrap();

    let batch = sign_batch(&input, &output, &config).await.unwrap();
    let log = load_log(&batch.log_path).await;
    let entry = &log.signed_files[0];

    assert_eq!(entry.signature, signature_path);
    assert_eq!(entry.pages_filter, "1-2");
    assert_eq!(entry.scale, 0.25);
    assert_eq!(entry.x_offset, 1.0);
    assert_eq!(entry.y_offset, 0.5);
    assert_eq!(entry.total_pages, 3);
    assert_eq!(entry.pages_signed, 2);
}

#[tokio::test]
async fn test_missing_input_directory_is_an_error() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let result = sign_batch(dir.path().join("nope"), dir.path().join("out"), &config).await;

    match result {
        Err(StampError::Config(msg)) => assert!(msg.contains("Input directory")),
        other => panic!("Expected Config error, got {:?}", other.map(|_| ())),
    }
}
