//! A hand-built town for the demo: the kind of location graph the raster
//! extractor would normally produce, small enough to read.
//!
//! ```text
//!   home0  home1 | office0      home2  home3 | office1
//!      \    |    |    |            \    |    |   |
//!       [plaza west] ————————————— [plaza east]
//!          |      \                 /     |
//!        shop      ——— [main st] ———   hospital
//!                          |
//!                       stadium
//! ```

use epi_core::{GridPoint, LocationId, TimeOfDay};
use epi_map::{Location, LocationType, OfficeHours, WorldMap};

pub struct Town {
    pub map:     WorldMap,
    pub homes:   Vec<LocationId>,
    pub shop:    LocationId,
    pub stadium: LocationId,
}

pub fn build_town() -> Town {
    let mut map = WorldMap::new(1.0);

    let homes = vec![
        map.add_location(LocationType::Home, 5, 1, GridPoint::new(0.0, 0.0)),
        map.add_location(LocationType::Home, 5, 1, GridPoint::new(2.0, 0.0)),
        map.add_location(LocationType::Home, 5, 1, GridPoint::new(8.0, 0.0)),
        map.add_location(LocationType::Home, 5, 1, GridPoint::new(10.0, 0.0)),
    ];
    let offices = vec![
        map.add_location(LocationType::Office, 12, 2, GridPoint::new(4.0, 0.0)),
        map.add_location(LocationType::Office, 20, 2, GridPoint::new(12.0, 0.0)),
    ];
    let shop = map.add_location(LocationType::Shop, 15, 2, GridPoint::new(0.0, 4.0));
    let stadium = map.add_location(LocationType::Convention, 60, 4, GridPoint::new(6.0, 6.0));
    let hospital = map.add_location(LocationType::Hospital, 25, 2, GridPoint::new(11.0, 4.0));

    let plaza_w = map.add_location(LocationType::Public, Location::UNBOUNDED, 2, GridPoint::new(2.0, 2.0));
    let plaza_e = map.add_location(LocationType::Public, Location::UNBOUNDED, 2, GridPoint::new(9.0, 2.0));
    let main_st = map.add_location(LocationType::Public, Location::UNBOUNDED, 3, GridPoint::new(6.0, 4.0));

    for &h in &homes[..2] {
        map.connect(h, plaza_w);
    }
    for &h in &homes[2..] {
        map.connect(h, plaza_e);
    }
    map.connect(offices[0], plaza_w);
    map.connect(offices[1], plaza_e);
    map.connect(shop, plaza_w);
    map.connect(hospital, plaza_e);
    map.connect(plaza_w, main_st);
    map.connect(plaza_e, main_st);
    map.connect(stadium, main_st);

    // Office workdays, fixed once like the extractor would.
    map.location_mut(offices[0]).office_hours =
        Some(OfficeHours::new(TimeOfDay::from_hours(9), 8 * 60));
    map.location_mut(offices[1]).office_hours =
        Some(OfficeHours::new(TimeOfDay::from_hours(8), 9 * 60));

    Town { map, homes, shop, stadium }
}
