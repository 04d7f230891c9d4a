use gloo_storage::{LocalStorage, Storage};

const TOKEN_STORAGE_KEY: &str = "cartoview_access_token";
const FRAGMENT_TOKEN_KEY: &str = "access_token";

fn token_from_fragment(hash: &str) -> Option<String> {
    hash.trim_start_matches('#')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == FRAGMENT_TOKEN_KEY)
        .map(|(_, value)| value.to_owned())
        .filter(|value| !value.is_empty())
}

fn clear_fragment(window: &web_sys::Window) {
    let location = window.location();
    let (Ok(path), Ok(search)) = (location.pathname(), location.search()) else {
        return;
    };
    if let Ok(history) = window.history() {
        let _ = history.replace_state_with_url(
            &wasm_bindgen::JsValue::NULL,
            "",
            Some(&format!("{path}{search}")),
        );
    }
}

/// Access token for the map-config service, if the user has one.
///
/// A token in the URL fragment (OAuth redirect) is saved to local storage and
/// stripped from the address bar; otherwise the saved token is used.
pub fn obtain_token() -> Option<String> {
    if let Some(window) = web_sys::window()
        && let Ok(hash) = window.location().hash()
        && let Some(token) = token_from_fragment(&hash)
    {
        if let Err(e) = LocalStorage::set(TOKEN_STORAGE_KEY, &token) {
            web_sys::console::warn_1(&format!("Could not persist access token: {e}").into());
        }
        clear_fragment(&window);
        return Some(token);
    }

    LocalStorage::get::<String>(TOKEN_STORAGE_KEY)
        .ok()
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::token_from_fragment;

    #[test]
    fn reads_access_token_from_fragment() {
        assert_eq!(
            token_from_fragment("#state=x&access_token=abc.def&expires_in=3600"),
            Some("abc.def".to_string())
        );
    }

    #[test]
    fn missing_or_empty_token_is_none() {
        assert_eq!(token_from_fragment(""), None);
        assert_eq!(token_from_fragment("#access_token="), None);
        assert_eq!(token_from_fragment("#section-2"), None);
    }
}
