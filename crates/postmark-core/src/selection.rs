//! Random post suggestion: one content and a few images, balanced between
//! AI-generated and human images.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::record::{CreatedBy, ImageRecord};

pub const MIN_IMAGES: usize = 3;
pub const MAX_IMAGES: usize = 5;

/// Pick `count` items, half from each partition.
///
/// Each partition contributes `count / 2` items from its front. For an odd
/// `count` the extra item is the first leftover AI item, then the first
/// leftover human item. If one side runs short the other side's leftovers
/// fill the gap. The result is shorter than `count` only when both lists
/// together are.
pub fn pick_balanced<T: Clone>(ai: &[T], human: &[T], count: usize) -> Vec<T> {
    let half = count / 2;
    let from_ai = half.min(ai.len());
    let from_human = half.min(human.len());

    let mut picked: Vec<T> = ai[..from_ai]
        .iter()
        .chain(&human[..from_human])
        .cloned()
        .collect();

    let missing = count.saturating_sub(picked.len());
    picked.extend(
        ai[from_ai..]
            .iter()
            .chain(&human[from_human..])
            .take(missing)
            .cloned(),
    );
    picked
}

/// Shuffle both partitions and pick 3 to 5 images.
pub fn random_selection<'a, R: Rng>(
    images: &'a [ImageRecord],
    rng: &mut R,
) -> Vec<&'a ImageRecord> {
    let count = rng.gen_range(MIN_IMAGES..=MAX_IMAGES);

    let (mut ai, mut human): (Vec<_>, Vec<_>) = images
        .iter()
        .partition(|image| image.created_by == CreatedBy::Ai);
    ai.shuffle(rng);
    human.shuffle(rng);

    let picked = pick_balanced(&ai, &human, count);
    log::debug!(
        "picked {} of {} images ({} ai, {} human available)",
        picked.len(),
        images.len(),
        ai.len(),
        human.len()
    );
    picked
}

/// Uniformly pick one item, or `None` if there are none.
pub fn pick_content<'a, T, R: Rng>(contents: &'a [T], rng: &mut R) -> Option<&'a T> {
    contents.choose(rng)
}
