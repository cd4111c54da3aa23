use gloo_file::File as GlooFile;
use gloo_timers::callback::Timeout;
use shared::raster::is_decodable_mime;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::FileList;
use yew::prelude::*;

// Debounce function to limit button events
pub fn debounce<F>(duration: u32, callback: F) -> Callback<MouseEvent>
where
    F: Fn() + Clone + 'static,
{
    let timeout = Rc::new(RefCell::new(None::<Timeout>));

    Callback::from(move |_| {
        let mut timeout_ref = timeout.borrow_mut();

        if let Some(old_timeout) = timeout_ref.take() {
            old_timeout.cancel();
        }

        let inner_callback = callback.clone();
        *timeout_ref = Some(Timeout::new(duration, move || {
            inner_callback();
        }));
    })
}

/// First decodable image in the list; anything else is skipped.
pub fn first_image_file(file_list: &FileList) -> Option<GlooFile> {
    let mut chosen = None;
    for i in 0..file_list.length() {
        let Some(file) = file_list.item(i) else {
            continue;
        };
        if !is_decodable_mime(&file.type_()) {
            log::warn!("Skipping unsupported file {} ({})", file.name(), file.type_());
        } else if chosen.is_none() {
            chosen = Some(GlooFile::from(file));
        } else {
            log::info!("Only one image is used at a time, ignoring {}", file.name());
        }
    }
    chosen
}
