use std::env;
use std::sync::Once;

use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::arena::{NodeId, TreeArena};
use crate::errors::TreeResult;
use crate::node::NodeData;

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "debug");
        }
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    let noisy_modules = ["config"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Inserts a labelled node, with a single token when `word` is given.
pub fn labelled(arena: &mut TreeArena, label: &str, word: Option<&str>) -> NodeId {
    let tokens = word.map(|w| vec![w.to_string()]).unwrap_or_default();
    let mut data = NodeData::with_tokens(tokens).with_label(label);
    data.value = word.map(str::to_string);
    arena.insert_node(data)
}

/// Builds `(S (NP (DT the) (NN dog)) (VP (VBZ barks)))` and returns the root.
///
/// Word nodes are leaves labelled with the word itself.
pub fn sample_sentence(arena: &mut TreeArena) -> TreeResult<NodeId> {
    let the = labelled(arena, "the", Some("the"));
    let dog = labelled(arena, "dog", Some("dog"));
    let barks = labelled(arena, "barks", Some("barks"));

    let dt = labelled(arena, "DT", None);
    let nn = labelled(arena, "NN", None);
    let vbz = labelled(arena, "VBZ", None);
    arena.connect(dt, vec![the])?;
    arena.connect(nn, vec![dog])?;
    arena.connect(vbz, vec![barks])?;

    let np = labelled(arena, "NP", None);
    let vp = labelled(arena, "VP", None);
    arena.connect(np, vec![dt, nn])?;
    arena.connect(vp, vec![vbz])?;

    let s = labelled(arena, "S", None);
    arena.connect(s, vec![np, vp])?;
    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_setup() {
        init_test_setup();
        init_test_setup();
    }

    #[test]
    fn given_sample_sentence_when_built_then_has_nine_nodes() {
        let mut arena = TreeArena::new();
        let s = sample_sentence(&mut arena).unwrap();
        assert_eq!(arena.len(), 9);
        assert_eq!(arena.subtree_size(s).unwrap(), 9);
    }
}
