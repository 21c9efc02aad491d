/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use std::collections::BTreeMap;

/// Name of the query parameter carrying the request signature
pub const SIGNATURE_PARAM: &str = "api_sig";

/// Parameters for a single API call. Kept sorted by key so the signature is stable.
pub type ApiParams = BTreeMap<String, String>;

/// Computes the request signature.
///
/// The pairs are sorted by key and concatenated behind the shared secret with no separators,
/// i.e. `secret + k1 + v1 + k2 + v2 ...`, and the MD5 of that string is returned as lowercase
/// hex. The order the pairs are supplied in does not matter.
pub fn sign<K, V>(params: impl IntoIterator<Item = (K, V)>, secret: &str) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut pairs: Vec<(K, V)> = params.into_iter().collect();
    pairs.sort_by(|a, b| {
        a.0.as_ref()
            .cmp(b.0.as_ref())
            .then_with(|| a.1.as_ref().cmp(b.1.as_ref()))
    });

    let mut payload = String::from(secret);
    for (k, v) in &pairs {
        payload.push_str(k.as_ref());
        payload.push_str(v.as_ref());
    }
    format!("{:x}", md5::compute(payload.as_bytes()))
}

/// Signs every parameter present and stores the result under [`SIGNATURE_PARAM`].
///
/// Any signature already present is replaced, never included in the digest.
pub fn sign_params(params: &mut ApiParams, secret: &str) {
    params.remove(SIGNATURE_PARAM);
    let signature = sign(params.iter(), secret);
    params.insert(SIGNATURE_PARAM.to_string(), signature);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_is_order_independent() {
        let forward = [("method", "flickr.auth.getFrob"), ("api_key", "key"), ("perms", "read")];
        let mut reversed = forward;
        reversed.reverse();

        assert_eq!(sign(forward, "secret"), sign(reversed, "secret"));
    }

    #[test]
    fn signature_matches_published_scheme() {
        // secret + "api_key" + "key" + "method" + "flickr.auth.getFrob"
        let expected = format!(
            "{:x}",
            md5::compute("secretapi_keykeymethodflickr.auth.getFrob")
        );
        let sig = sign(
            [("method", "flickr.auth.getFrob"), ("api_key", "key")],
            "secret",
        );
        assert_eq!(sig, expected);
        assert_eq!(sig.len(), 32);
    }

    #[test]
    fn signature_changes_with_any_input() {
        let base = [("api_key", "key"), ("frob", "123"), ("method", "m")];
        let sig = sign(base, "secret");

        for i in 0..base.len() {
            let mut changed = base;
            changed[i].1 = "other";
            assert_ne!(sign(changed, "secret"), sig, "changing {} kept signature", base[i].0);
        }
        assert_ne!(sign(base, "secret2"), sig);
    }

    #[test]
    fn sign_params_replaces_existing_signature() {
        let mut params = ApiParams::new();
        params.insert("api_key".into(), "key".into());
        params.insert(SIGNATURE_PARAM.into(), "stale".into());

        sign_params(&mut params, "secret");

        assert_eq!(params[SIGNATURE_PARAM], sign([("api_key", "key")], "secret"));
        assert_eq!(params.len(), 2);
    }
}
