//! Asset fetching over XHR so download progress can be reported.

use js_sys::{Function, Promise, Uint8Array};
use panorama_core::{LoadError, LoadedModel};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

fn fetch_error(path: &str, reason: impl Into<String>) -> LoadError {
    LoadError::Fetch {
        path: path.to_string(),
        reason: reason.into(),
    }
}

pub async fn fetch_bytes(path: &str) -> Result<Vec<u8>, LoadError> {
    let xhr = web::XmlHttpRequest::new().map_err(|e| fetch_error(path, format!("{:?}", e)))?;
    xhr.open("GET", path)
        .map_err(|e| fetch_error(path, format!("{:?}", e)))?;
    xhr.set_response_type(web::XmlHttpRequestResponseType::Arraybuffer);

    let label = path.to_string();
    let on_progress = Closure::wrap(Box::new(move |ev: web::ProgressEvent| {
        if ev.length_computable() && ev.total() > 0.0 {
            log::info!(
                "[load] {} {:.0}% loaded",
                label,
                ev.loaded() / ev.total() * 100.0
            );
        }
    }) as Box<dyn FnMut(web::ProgressEvent)>);
    xhr.set_onprogress(Some(on_progress.as_ref().unchecked_ref()));

    let done = Promise::new(&mut |resolve: Function, reject: Function| {
        xhr.set_onload(Some(&resolve));
        xhr.set_onerror(Some(&reject));
    });
    xhr.send()
        .map_err(|e| fetch_error(path, format!("{:?}", e)))?;
    let outcome = JsFuture::from(done).await;
    xhr.set_onprogress(None);
    drop(on_progress);
    outcome.map_err(|_| fetch_error(path, "network error"))?;

    let status = xhr.status().unwrap_or(0);
    if !(200..300).contains(&status) {
        return Err(LoadError::Status {
            path: path.to_string(),
            status,
        });
    }
    let body = xhr
        .response()
        .map_err(|e| fetch_error(path, format!("{:?}", e)))?;
    Ok(Uint8Array::new(&body).to_vec())
}

pub async fn load_model(path: &str) -> Result<LoadedModel, LoadError> {
    let bytes = fetch_bytes(path).await?;
    LoadedModel::from_gltf_slice(path, &bytes)
}

pub async fn load_image(path: &str) -> Result<image::DynamicImage, LoadError> {
    let bytes = fetch_bytes(path).await?;
    let img = image::load_from_memory(&bytes).map_err(|e| LoadError::Image(e.to_string()))?;
    log::info!("[load] {} decoded {}x{}", path, img.width(), img.height());
    Ok(img)
}
