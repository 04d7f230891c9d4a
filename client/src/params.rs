use cartoview_shared::QueryParams;
use wasm_bindgen::JsCast;

/// Current page's query string as a decoded key/value map. Later duplicates win.
pub fn read_query() -> QueryParams {
    let mut params = QueryParams::new();
    let Some(window) = web_sys::window() else {
        return params;
    };
    let Ok(search) = window.location().search() else {
        return params;
    };
    let Ok(parsed) = web_sys::UrlSearchParams::new_with_str(&search) else {
        return params;
    };

    let Ok(Some(entries)) = js_sys::try_iter(parsed.as_ref()) else {
        return params;
    };
    for entry in entries.flatten() {
        let Ok(pair) = entry.dyn_into::<js_sys::Array>() else {
            continue;
        };
        let (Some(key), Some(value)) = (pair.get(0).as_string(), pair.get(1).as_string()) else {
            continue;
        };
        params.insert(key, value);
    }
    params
}
