//! Built-in trivia questions.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: &'static str,
    pub prompt: &'static str,
    pub options: [&'static str; 3],
    pub correct_index: usize,
}

const fn q(id: &'static str, prompt: &'static str, options: [&'static str; 3], correct_index: usize) -> Question {
    Question { id, prompt, options, correct_index }
}

pub const QUESTION_BANK: [Question; 30] = [
    q("q1", "Which bird is most closely associated with the \"honk\" call and often travels in V-shaped flocks?", ["Duck", "Goose", "Sparrow"], 1),
    q("q2", "Which bird is famous for its ability to rotate its head far more than most other birds?", ["Owl", "Chicken", "Swan"], 0),
    q("q3", "Which bird is most likely to be seen swimming on ponds and dabbling for food near the surface?", ["Eagle", "Duck", "Woodpecker"], 1),
    q("q4", "Which bird is best known for powerful soaring flight and keen eyesight used for hunting?", ["Eagle", "Titmouse", "Goose"], 0),
    q("q5", "Which bird is most commonly kept for eggs and is found on farms worldwide?", ["Chicken", "Flamingo", "Hawk"], 0),
    q("q6", "Which bird is best known for having a bright pink coloration in many species due to its diet?", ["Parrot", "Flamingo", "Penguin"], 1),
    q("q7", "Which bird is most strongly associated with pecking tree trunks to find insects?", ["Swan", "Woodpecker", "Goose"], 1),
    q("q8", "Which bird is often used as a symbol of peace and is commonly depicted in art as white?", ["Pelican", "Dove", "Crow"], 1),
    q("q9", "Which bird is flightless and adapted for swimming with flipper-like wings?", ["Penguin", "Peacock", "Sparrow"], 0),
    q("q10", "Which bird is known for a large, colorful tail display used in courtship?", ["Goose", "Peacock", "Duck"], 1),
    q("q11", "Which bird commonly mimics sounds and human speech better than many other birds?", ["Parrot", "Eagle", "Turkey"], 0),
    q("q12", "Which bird is a raptor that is active mostly at night and hunts using silent flight?", ["Swan", "Owl", "Chicken"], 1),
    q("q13", "Which bird often builds large nests on rooftops or tall structures and is linked with wetlands?", ["Stork", "Titmouse", "Penguin"], 0),
    q("q14", "Which bird is especially known for long migrations and catching insects in flight with fast turns?", ["Swallow", "Chicken", "Vulture"], 0),
    q("q15", "Which bird is commonly seen in cities, is highly intelligent, and belongs to the corvid family?", ["Pelican", "Crow", "Flamingo"], 1),
    q("q16", "Which bird has a broad, flat bill adapted for filtering or grabbing food from water?", ["Duck", "Eagle", "Owl"], 0),
    q("q17", "Which bird is most associated with a deep \"gobble\" sound?", ["Turkey", "Swan", "Dove"], 0),
    q("q18", "Which bird is known for standing on one leg and feeding in shallow water by sweeping its bill?", ["Flamingo", "Hawk", "Sparrow"], 0),
    q("q19", "Which bird is a large seabird famous for a throat pouch used when catching fish?", ["Titmouse", "Pelican", "Peacock"], 1),
    q("q20", "Which bird is small, often yellow-and-blue in Europe, and frequently visits feeders in winter?", ["Goose", "Eagle", "Titmouse"], 2),
    q("q21", "Which bird is best known for gliding on water with a long neck and is often found on lakes?", ["Swan", "Woodpecker", "Parrot"], 0),
    q("q22", "Which bird hunts by circling high on rising air currents and is often a scavenger?", ["Vulture", "Duck", "Robin"], 0),
    q("q23", "Which bird is known for a red breast in many regions and often appears in winter-themed imagery?", ["Robin", "Penguin", "Stork"], 0),
    q("q24", "Which bird has strong legs, a long bill, and catches fish while standing still in water?", ["Heron", "Turkey", "Dove"], 0),
    q("q25", "Which bird group is best known for exceptionally sharp talons used to grab prey?", ["Raptors", "Songbirds", "Waterfowl"], 0),
    q("q26", "Which bird's streamlined body and webbed feet make it especially adapted for swimming?", ["Woodpecker", "Duck", "Hawk"], 1),
    q("q27", "Which bird has iridescent green-blue plumage and a fan-shaped tail display?", ["Peacock", "Goose", "Sparrow"], 0),
    q("q28", "Which bird is most likely to be kept as a domestic bird that crows at dawn?", ["Swan", "Rooster", "Pelican"], 1),
    q("q29", "Which bird catches insects at dusk with rapid, acrobatic flight and long wings?", ["Swallow", "Chicken", "Penguin"], 0),
    q("q30", "Which bird is one of the most powerful fliers for long-distance ocean travel, using dynamic soaring?", ["Albatross", "Titmouse", "Duck"], 0),
];
