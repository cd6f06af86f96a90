use std::io::Cursor;

use base64::{Engine as _, engine::general_purpose};

use super::*;

fn loader() -> RasterLoader {
    RasterLoader::new(LoaderConfig::default()).unwrap()
}

fn logo_data_url() -> String {
    let img = image::RgbaImage::from_raw(1, 1, vec![0, 255, 0, 255]).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    format!("data:image/png;base64,{}", general_purpose::STANDARD.encode(&buf))
}

#[test]
fn background_url_encodes_prompt_and_size() {
    let url = loader()
        .background_url("sunset / beach & palms", Canvas::square(540).unwrap(), 42)
        .unwrap();
    assert_eq!(
        url.as_str(),
        "https://image.pollinations.ai/prompt/sunset%20%2F%20beach%20&%20palms?width=540&height=540&nologo=true&seed=42"
    );
}

#[test]
fn background_url_rejects_bad_endpoint() {
    let l = RasterLoader::new(LoaderConfig {
        image_endpoint: "not a url".into(),
        ..LoaderConfig::default()
    })
    .unwrap();
    assert!(l.background_url("x", Canvas::default(), 1).is_err());
}

#[tokio::test]
async fn spawn_logo_publishes_ready_event() {
    let (tx, mut rx) = mpsc::channel(4);
    loader().spawn_logo(logo_data_url(), tx).await.unwrap();

    match rx.recv().await.unwrap() {
        DesignEvent::RasterReady { target, raster } => {
            assert_eq!(target, RasterTarget::Logo);
            assert_eq!(raster.rgba8_premul.as_slice(), &[0, 255, 0, 255]);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn spawn_logo_publishes_failure_for_bad_payload() {
    let (tx, mut rx) = mpsc::channel(4);
    loader()
        .spawn_logo("data:image/png;base64,AAAA".into(), tx)
        .await
        .unwrap();

    assert!(matches!(
        rx.recv().await.unwrap(),
        DesignEvent::RasterFailed {
            target: RasterTarget::Logo,
            ..
        }
    ));
}

#[tokio::test]
async fn data_url_background_needs_no_network() {
    let (tx, mut rx) = mpsc::channel(4);
    loader()
        .spawn_background(
            RasterSource::DataUrl(logo_data_url()),
            Canvas::default(),
            0,
            tx,
        )
        .await
        .unwrap();

    assert!(matches!(
        rx.recv().await.unwrap(),
        DesignEvent::RasterReady {
            target: RasterTarget::Background,
            ..
        }
    ));
}

#[tokio::test]
async fn closed_receiver_is_not_an_error() {
    let (tx, rx) = mpsc::channel(1);
    drop(rx);
    loader().spawn_logo(logo_data_url(), tx).await.unwrap();
}
