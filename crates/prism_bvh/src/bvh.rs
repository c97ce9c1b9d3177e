use crate::build::{build, BuildOutput};
use crate::node::BvhNode;
use crate::stats::SplitCounts;
use crate::{BvhConfig, BvhResult, Primitive};

/// A bounding volume hierarchy over objects of type `P`.
///
/// Owns the node store and the reordered object array. Both are fixed once
/// [`Bvh::build`] returns; queries (see [`crate::Accelerator`]) only read
/// them, so a `Bvh` can be shared between threads freely.
///
/// `P` can be the objects themselves or any handle to them (`&T`, `Box<T>`,
/// `Arc<T>`), since [`Primitive`] is implemented for all of those.
#[derive(Debug)]
pub struct Bvh<P> {
    pub(crate) nodes: Vec<BvhNode>,
    pub(crate) objects: Vec<P>,
    pub(crate) source_indices: Vec<usize>,
    pub(crate) config: BvhConfig,
    pub(crate) splits: SplitCounts,
}

impl<P: Primitive> Bvh<P> {
    /// Build a tree with the default configuration.
    ///
    /// An empty input produces a tree whose root is a leaf over zero objects;
    /// every query on it misses.
    pub fn build(objects: Vec<P>) -> Self {
        Self::from_output(build(objects, &BvhConfig::default()), BvhConfig::default())
    }

    /// Build a tree with custom parameters.
    pub fn with_config(objects: Vec<P>, config: BvhConfig) -> BvhResult<Self> {
        config.validate()?;
        Ok(Self::from_output(build(objects, &config), config))
    }

    fn from_output(output: BuildOutput<P>, config: BvhConfig) -> Self {
        let BuildOutput {
            nodes,
            objects,
            source_indices,
            splits,
        } = output;
        Self {
            nodes,
            objects,
            source_indices,
            config,
            splits,
        }
    }
}

impl<P> Bvh<P> {
    /// The node store; index 0 is the root.
    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    pub fn root(&self) -> &BvhNode {
        &self.nodes[0]
    }

    /// Objects in tree order: every leaf covers a contiguous run.
    pub fn objects(&self) -> &[P] {
        &self.objects
    }

    /// Position in the build input of the object now stored at `slot`.
    pub fn source_index(&self, slot: usize) -> usize {
        self.source_indices[slot]
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn config(&self) -> &BvhConfig {
        &self.config
    }

    /// Give the objects back, in tree order.
    pub fn into_objects(self) -> Vec<P> {
        self.objects
    }
}
