//! Static territory graph: adjacency, continents and choke points.
//!
//! The board is the classic 42-territory Earth map. Territory ids are laid
//! out continent by continent, so continent membership is a pure function
//! of the id through [`CONTINENT_BOUNDS`].
//!
//! | Continent | Id | Territories |
//! |-----------|----|-------------|
//! | North America | 0 | 0..9 |
//! | Europe | 1 | 9..16 |
//! | Asia | 2 | 16..28 |
//! | South America | 3 | 28..32 |
//! | Africa | 4 | 32..38 |
//! | Australia | 5 | 38..42 |

use std::collections::BTreeSet;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Territory identifier (0..42).
pub type TerritoryId = usize;

/// Continent identifier (0..6).
pub type ContinentId = usize;

/// Number of territories on the board.
pub const TERRITORY_COUNT: usize = 42;

/// Number of continents on the board.
pub const CONTINENT_COUNT: usize = 6;

/// First territory id of each continent, plus the end sentinel.
pub const CONTINENT_BOUNDS: [TerritoryId; CONTINENT_COUNT + 1] = [0, 9, 16, 28, 32, 38, 42];

/// Earth adjacency, indexed by territory id.
const EARTH_ADJACENCY: [&[TerritoryId]; TERRITORY_COUNT] = [
    // North America
    &[1, 5, 21],         // 0 Alaska
    &[0, 5, 6, 8],       // 1 Alberta
    &[3, 8, 30],         // 2 Central America
    &[2, 6, 7, 8],       // 3 Eastern United States
    &[5, 6, 7, 10],      // 4 Greenland
    &[0, 1, 4, 6],       // 5 Northwest Territory
    &[1, 3, 4, 5, 7, 8], // 6 Ontario
    &[3, 4, 6],          // 7 Quebec
    &[1, 2, 3, 6],       // 8 Western United States
    // Europe
    &[10, 11, 12, 15],         // 9 Great Britain
    &[4, 9, 12],               // 10 Iceland
    &[9, 12, 13, 14, 15],      // 11 Northern Europe
    &[9, 10, 11, 14],          // 12 Scandinavia
    &[11, 14, 15, 22, 34, 36], // 13 Southern Europe
    &[11, 12, 13, 16, 22, 26], // 14 Ukraine
    &[9, 11, 13, 36],          // 15 Western Europe
    // Asia
    &[14, 17, 18, 22, 26],     // 16 Afghanistan
    &[16, 18, 23, 24, 25, 26], // 17 China
    &[16, 17, 22, 24],         // 18 India
    &[21, 23, 25, 27],         // 19 Irkutsk
    &[21, 23],                 // 20 Japan
    &[0, 19, 20, 23, 27],      // 21 Kamchatka
    &[13, 14, 16, 18, 33, 34], // 22 Middle East
    &[17, 19, 20, 21, 25],     // 23 Mongolia
    &[17, 18, 40],             // 24 Siam
    &[17, 19, 23, 26, 27],     // 25 Siberia
    &[14, 16, 17, 25],         // 26 Ural
    &[19, 21, 25],             // 27 Yakutsk
    // South America
    &[29, 31],         // 28 Argentina
    &[28, 30, 31, 36], // 29 Brazil
    &[2, 29, 31],      // 30 Venezuela
    &[28, 29, 30],     // 31 Peru
    // Africa
    &[33, 36, 37],             // 32 Congo
    &[22, 32, 34, 35, 36, 37], // 33 East Africa
    &[13, 22, 33, 36],         // 34 Egypt
    &[33, 37],                 // 35 Madagascar
    &[13, 15, 29, 32, 33, 34], // 36 North Africa
    &[32, 33, 35],             // 37 South Africa
    // Australia
    &[39, 41],     // 38 Eastern Australia
    &[38, 40, 41], // 39 New Guinea
    &[24, 39, 41], // 40 Indonesia
    &[38, 39, 40], // 41 Western Australia
];

const CONTINENT_ADJACENCY: [&[ContinentId]; CONTINENT_COUNT] =
    [&[3, 1, 2], &[0, 4, 2], &[5, 4, 1], &[4, 0], &[3, 1, 2], &[2]];

/// Territories inside each continent that border the outside.
const IN_CHOKES: [&[TerritoryId]; CONTINENT_COUNT] = [
    &[0, 2, 4],
    &[10, 14, 13, 15],
    &[21, 24, 26, 16, 22],
    &[29, 30],
    &[33, 34, 36],
    &[40],
];

/// Territories outside each continent that border into it.
const OUT_CHOKES: [&[TerritoryId]; CONTINENT_COUNT] = [
    &[10, 21, 30],
    &[4, 16, 22, 26, 34, 36],
    &[0, 14, 13, 33, 34, 40],
    &[2, 36],
    &[13, 15, 22, 29],
    &[24],
];

/// Static weight per continent; lower is preferred when ranking neighbours.
const PRIORITY_SCORE: [u8; CONTINENT_COUNT] = [3, 5, 6, 2, 4, 1];

/// Default continent preference, highest priority first.
const BASE_PRIORITY: [ContinentId; CONTINENT_COUNT] = [3, 5, 0, 4, 1, 2];

fn table_to_vecs(table: &[&[usize]]) -> Vec<Vec<usize>> {
    table.iter().map(|row| row.to_vec()).collect()
}

/// Read-only board structure, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerritoryGraph {
    adjacency: Vec<Vec<TerritoryId>>,
    continent_adjacency: Vec<Vec<ContinentId>>,
    in_chokes: Vec<Vec<TerritoryId>>,
    out_chokes: Vec<Vec<TerritoryId>>,
}

impl TerritoryGraph {
    /// Build the Earth board.
    #[must_use]
    pub fn earth() -> Self {
        Self {
            adjacency: table_to_vecs(&EARTH_ADJACENCY),
            continent_adjacency: table_to_vecs(&CONTINENT_ADJACENCY),
            in_chokes: table_to_vecs(&IN_CHOKES),
            out_chokes: table_to_vecs(&OUT_CHOKES),
        }
    }

    /// Number of territories on this board.
    #[must_use]
    pub fn territory_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Territories adjacent to `territory`. Unknown ids have no neighbours.
    #[must_use]
    pub fn adjacent(&self, territory: TerritoryId) -> &[TerritoryId] {
        self.adjacency.get(territory).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `a` and `b` share a border.
    #[must_use]
    pub fn are_adjacent(&self, a: TerritoryId, b: TerritoryId) -> bool {
        self.adjacent(a).contains(&b)
    }

    /// Every territory adjacent to some member of `territories` but not in it.
    pub fn all_adjacent<'a, I>(&self, territories: I) -> BTreeSet<TerritoryId>
    where
        I: IntoIterator<Item = &'a TerritoryId>,
    {
        let members: BTreeSet<TerritoryId> = territories.into_iter().copied().collect();
        members
            .iter()
            .flat_map(|&t| self.adjacent(t).iter().copied())
            .filter(|t| !members.contains(t))
            .collect()
    }

    /// Continent that owns `territory`, or `None` for an out-of-range id.
    #[must_use]
    pub fn continent_of(&self, territory: TerritoryId) -> Option<ContinentId> {
        (0..CONTINENT_COUNT).find(|&c| territory < CONTINENT_BOUNDS[c + 1])
    }

    /// Territory id range of a continent.
    #[must_use]
    pub fn continent_territories(&self, continent: ContinentId) -> Range<TerritoryId> {
        match continent {
            c if c < CONTINENT_COUNT => CONTINENT_BOUNDS[c]..CONTINENT_BOUNDS[c + 1],
            _ => 0..0,
        }
    }

    /// Continents bordering `continent`.
    #[must_use]
    pub fn continent_neighbours(&self, continent: ContinentId) -> &[ContinentId] {
        self.continent_adjacency
            .get(continent)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// In-choke territories of `continent`.
    #[must_use]
    pub fn in_chokes(&self, continent: ContinentId) -> &[TerritoryId] {
        self.in_chokes.get(continent).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Out-choke territories of `continent`.
    #[must_use]
    pub fn out_chokes(&self, continent: ContinentId) -> &[TerritoryId] {
        self.out_chokes.get(continent).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Static priority weight of `continent` (lower ranks first).
    #[must_use]
    pub fn priority_score(&self, continent: ContinentId) -> u8 {
        PRIORITY_SCORE.get(continent).copied().unwrap_or(u8::MAX)
    }

    /// Default continent preference order.
    #[must_use]
    pub fn base_priority(&self) -> Vec<ContinentId> {
        BASE_PRIORITY.to_vec()
    }

    /// All continent ids.
    pub fn continents(&self) -> Range<ContinentId> {
        0..CONTINENT_COUNT
    }
}

impl Default for TerritoryGraph {
    fn default() -> Self {
        Self::earth()
    }
}
