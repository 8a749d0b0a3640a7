pub mod aggregator;
pub mod capabilities;
pub mod config;
pub mod controller;
pub mod discovery;
pub mod events;
pub mod form;
pub mod hierarchy;
pub mod navigation;
pub mod sink;
pub mod store;
pub mod tree;

pub use aggregator::{batch_state_updates, collect_states};
pub use capabilities::{LevelCapabilities, MergeFn, Rollup, capabilities_for};
pub use config::{load_options, options_from_toml, options_to_toml};
pub use controller::LevelController;
pub use discovery::{BlueprintNode, FormBlueprint, build_tree, load_blueprint};
pub use events::{
    ChannelSubscriber, EventBus, FormEvent, NavigationChange, Subscriber, TOPIC_INCLUSION_CHANGED,
    TOPIC_INITIALIZED, TOPIC_INPUT_UPDATED, TOPIC_NAVIGATION_CHANGED,
};
pub use form::Form;
pub use hierarchy::{build_from_parent, find_parent_hierarchy};
pub use navigation::NavigationOrchestrator;
pub use sink::{MemoryStateSink, StateSink};
pub use store::{ItemStore, StoreItem};
pub use tree::FormTree;
