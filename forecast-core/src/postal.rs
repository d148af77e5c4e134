//! Removes postal codes from geocoder-formatted addresses.
//!
//! Only US ZIP codes (`12345` / `12345-6789`) and Canadian postal codes
//! (`A1A 1A1`, space optional, any case) are recognised, and only when the
//! address ends with the matching country name. The first whitespace-led
//! code in the string is removed together with its leading whitespace.

/// Strip the postal code from `address`, or return it unchanged.
pub fn strip_postal_code(address: &str) -> String {
    if address.ends_with("USA") {
        strip_first(address, us_zip_len)
    } else if address.ends_with("Canada") {
        strip_first(address, canadian_postal_len)
    } else {
        address.to_string()
    }
}

/// Remove the first `<whitespace><code>` where `code_len` accepts the text
/// right after the whitespace.
fn strip_first(address: &str, code_len: fn(&[u8]) -> Option<usize>) -> String {
    for (start, c) in address.char_indices() {
        if !c.is_whitespace() {
            continue;
        }

        let code_start = start + c.len_utf8();
        if let Some(len) = code_len(&address.as_bytes()[code_start..]) {
            let end = code_start + len;
            return format!("{}{}", &address[..start], &address[end..]);
        }
    }

    address.to_string()
}

fn us_zip_len(rest: &[u8]) -> Option<usize> {
    if rest.len() < 5 || !rest[..5].iter().all(u8::is_ascii_digit) {
        return None;
    }

    let has_plus_four =
        rest.len() >= 10 && rest[5] == b'-' && rest[6..10].iter().all(u8::is_ascii_digit);

    Some(if has_plus_four { 10 } else { 5 })
}

fn canadian_postal_len(rest: &[u8]) -> Option<usize> {
    let is = |i: usize, pred: fn(&u8) -> bool| rest.get(i).is_some_and(pred);

    if !(is(0, u8::is_ascii_alphabetic) && is(1, u8::is_ascii_digit) && is(2, u8::is_ascii_alphabetic))
    {
        return None;
    }

    let second = if rest.get(3) == Some(&b' ') { 4 } else { 3 };

    (is(second, u8::is_ascii_digit)
        && is(second + 1, u8::is_ascii_alphabetic)
        && is(second + 2, u8::is_ascii_digit))
    .then_some(second + 3)
}
