//! Matching properties that must hold for any route set.

use axum::http::Method;
use segment_router::{MatchError, RouteError, RouteRegistry, RouteTree};

const ROUTES: &[(&str, &str)] = &[
    ("GET", "/"),
    ("GET", "/users"),
    ("POST", "/users"),
    ("GET", "/users/new"),
    ("GET", "/users/:id"),
    ("PUT", "/users/:id"),
    ("GET", "/users/:id/edit"),
    ("GET", "/users/:user_id/posts/:post_id"),
    ("GET", "/users/new/posts/latest"),
    ("GET", "/files/:name"),
    ("GET", "/files/*rest"),
    ("GET", "/files/:dir/readme"),
    ("GET", "/a/:x/c"),
    ("GET", "/a/b/:y"),
    ("GET", "/a/*rest"),
    ("DELETE", "/orgs/:org/teams/:team"),
];

const PATHS: &[&str] = &[
    "/",
    "/users",
    "/users/",
    "/users/new",
    "/users/42",
    "/users/42/edit",
    "/users/new/edit",
    "/users/7/posts/9",
    "/users/new/posts/latest",
    "/users/new/posts/other",
    "/files/a",
    "/files/a/readme",
    "/files/a/b/c",
    "/files",
    "/a/b/c",
    "/a/z/c",
    "/a/b/z/q",
    "/orgs/acme/teams/core",
    "/nope",
    "/users/42/unknown",
];

fn method(token: &str) -> Method {
    Method::from_bytes(token.as_bytes()).unwrap()
}

fn build(order: &[usize]) -> RouteTree<usize> {
    let mut registry = RouteRegistry::new();
    for &i in order {
        let (m, template) = ROUTES[i];
        registry.register(method(m), template, i).unwrap();
    }
    registry.build()
}

/// Outcome of every (method, path) pair, for comparing trees.
fn outcomes(tree: &RouteTree<usize>) -> Vec<Result<(usize, Vec<(String, String)>), MatchError>> {
    let mut results = Vec::new();
    for m in ["GET", "POST", "PUT", "DELETE", "PATCH"] {
        for path in PATHS {
            results.push(tree.find(&method(m), path).map(|found| {
                let params = found
                    .params()
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect();
                (*found.handler(), params)
            }));
        }
    }
    results
}

#[test]
fn test_registration_order_never_matters() {
    let baseline = outcomes(&build(&(0..ROUTES.len()).collect::<Vec<_>>()));

    let reversed: Vec<usize> = (0..ROUTES.len()).rev().collect();
    assert_eq!(outcomes(&build(&reversed)), baseline);

    for seed in 0..32 {
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut order: Vec<usize> = (0..ROUTES.len()).collect();
        rng.shuffle(&mut order);
        assert_eq!(outcomes(&build(&order)), baseline, "order {:?}", order);
    }
}

const ROUND_TRIP_TEMPLATES: &[&str] = &[
    "/Orgs/:org/Teams/:team",
    "/shop/:category/Items/:item",
    "/v/:version/assets/*asset",
    "/Docs/*path",
    "/caf\u{e9}/:id",
    "/a%20b/:id",
];

const PLAIN: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789-_.~";

const ESCAPES: &[(&str, &str)] = &[
    ("%20", " "),
    ("%2F", "/"),
    ("%25", "%"),
    ("%3A", ":"),
    ("%C3%A9", "\u{e9}"),
    ("%E2%82%AC", "\u{20ac}"),
];

/// A random non-empty segment: its encoded form and the value it decodes to.
fn random_value(rng: &mut fastrand::Rng) -> (String, String) {
    let mut encoded = String::new();
    let mut decoded = String::new();
    for _ in 0..rng.usize(1..=8) {
        if rng.usize(0..5) == 0 {
            let (escape, text) = ESCAPES[rng.usize(0..ESCAPES.len())];
            encoded.push_str(escape);
            decoded.push_str(text);
        } else {
            let c = PLAIN[rng.usize(0..PLAIN.len())] as char;
            encoded.push(c);
            decoded.push(c);
        }
    }
    (encoded, decoded)
}

/// Re-spell static template text the way a client might: random ASCII case
/// and some characters percent-encoded.
fn respell_static(rng: &mut fastrand::Rng, text: &str) -> String {
    // Text that already holds escapes only gets its case changed.
    let encode = !text.contains('%');
    let mut out = String::new();
    for c in text.chars() {
        if !c.is_ascii() {
            out.push(c);
        } else if encode && rng.usize(0..4) == 0 {
            out.push_str(&format!("%{:02X}", c as u8));
        } else if rng.bool() {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c.to_ascii_lowercase());
        }
    }
    out
}

/// Build a request path for `template` plus the parameters it must yield.
fn fill(rng: &mut fastrand::Rng, template: &str) -> (String, Vec<(String, String)>) {
    let mut path = String::new();
    let mut expected = Vec::new();
    for segment in template.split('/').skip(1) {
        if let Some(name) = segment.strip_prefix(':') {
            let (encoded, decoded) = random_value(rng);
            path.push('/');
            path.push_str(&encoded);
            expected.push((name.to_string(), decoded));
        } else if let Some(name) = segment.strip_prefix('*') {
            let mut parts = Vec::new();
            for _ in 0..rng.usize(0..=3) {
                let (encoded, decoded) = random_value(rng);
                path.push('/');
                path.push_str(&encoded);
                parts.push(decoded);
            }
            expected.push((name.to_string(), parts.join("/")));
        } else {
            path.push('/');
            path.push_str(&respell_static(rng, segment));
        }
    }
    (path, expected)
}

#[test]
fn test_round_trip_recovers_parameters() {
    let mut registry = RouteRegistry::new();
    for (i, template) in ROUND_TRIP_TEMPLATES.iter().enumerate() {
        registry.get(template, i).unwrap();
    }
    let tree = registry.build();

    let mut rng = fastrand::Rng::with_seed(7);
    for (i, template) in ROUND_TRIP_TEMPLATES.iter().enumerate() {
        for _ in 0..200 {
            let (path, expected) = fill(&mut rng, template);
            let found = tree
                .find(&Method::GET, &path)
                .unwrap_or_else(|e| panic!("{} for {}: {}", path, template, e));
            assert_eq!(*found.handler(), i, "{}", path);
            assert_eq!(found.template(), *template);

            let params: Vec<(String, String)> = found
                .params()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            assert_eq!(params, expected, "{}", path);
        }
    }
}

#[test]
fn test_specificity_examples() {
    let tree = build(&(0..ROUTES.len()).collect::<Vec<_>>());

    let new = tree.find(&Method::GET, "/users/new").unwrap();
    assert_eq!(ROUTES[*new.handler()].1, "/users/new");

    let show = tree.find(&Method::GET, "/users/42").unwrap();
    assert_eq!(ROUTES[*show.handler()].1, "/users/:id");
    assert_eq!(show.params().get("id"), Some("42"));

    // Static "new" fails deeper, so the parameter branch is retried.
    let edit = tree.find(&Method::GET, "/users/new/edit").unwrap();
    assert_eq!(ROUTES[*edit.handler()].1, "/users/:id/edit");
    assert_eq!(edit.params().get("id"), Some("new"));

    let tree_match = tree.find(&Method::GET, "/files/a/b/c").unwrap();
    assert_eq!(ROUTES[*tree_match.handler()].1, "/files/*rest");
    assert_eq!(tree_match.params().get("rest"), Some("a/b/c"));

    let readme = tree.find(&Method::GET, "/files/a/readme").unwrap();
    assert_eq!(ROUTES[*readme.handler()].1, "/files/:dir/readme");
}

#[test]
fn test_not_found_and_method_not_allowed() {
    let tree = build(&(0..ROUTES.len()).collect::<Vec<_>>());

    assert_eq!(tree.find(&Method::GET, "/nope").unwrap_err(), MatchError::NotFound);
    assert_eq!(
        tree.find(&Method::POST, "/users/1").unwrap_err(),
        MatchError::MethodNotAllowed {
            allowed: vec![Method::GET, Method::PUT]
        }
    );
    assert_eq!(
        tree.find(&Method::GET, "/orgs/a/teams/b").unwrap_err(),
        MatchError::MethodNotAllowed {
            allowed: vec![Method::DELETE]
        }
    );
}

#[test]
fn test_conflicts_and_invalid_templates() {
    let mut registry = RouteRegistry::new();
    registry.get("/a/:x", 1).unwrap();
    assert!(matches!(registry.get("/a/:x", 2), Err(RouteError::Conflict { .. })));
    assert!(matches!(
        registry.get("/a/*rest/b", 3),
        Err(RouteError::InvalidTemplate { .. })
    ));

    // Failed registrations leave the tree as it was.
    let tree = registry.build();
    assert_eq!(tree.len(), 1);
    assert_eq!(*tree.find(&Method::GET, "/a/z").unwrap().handler(), 1);
    assert_eq!(tree.find(&Method::GET, "/a/q/b").unwrap_err(), MatchError::NotFound);
}

#[test]
fn test_concurrent_lookups_share_one_tree() {
    let tree = build(&(0..ROUTES.len()).collect::<Vec<_>>());
    let expected = outcomes(&tree);

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for _ in 0..50 {
                    assert_eq!(outcomes(&tree), expected);
                }
            });
        }
    });
}
