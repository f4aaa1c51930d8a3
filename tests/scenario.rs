use rand::{rngs::StdRng, SeedableRng};
use sandfall::{step, Brush, BrushMode, Grid, Shape, World, EMPTY};

#[test]
fn painted_cell_keeps_falling() {
    let mut grid = Grid::new(10);
    let mut rng = StdRng::seed_from_u64(1);
    grid.set(5, 5, 0x123456);

    step(&mut grid, &mut rng, false);
    assert_eq!(grid.get(5, 5), EMPTY);
    assert_eq!(grid.get(5, 6), 0x123456);

    step(&mut grid, &mut rng, false);
    assert_eq!(grid.get(5, 6), EMPTY);
    assert_eq!(grid.get(5, 7), 0x123456);
}

#[test]
fn pile_settles_then_drains_away() {
    let mut world = World::new(24, Brush::new(4.0, Shape::Disc), 99);
    let painted = world.paint_at((12, 4), BrushMode::Paint);
    assert_eq!(world.grid.occupied(), painted);

    for _ in 0..200 {
        world.tick();
    }
    assert_eq!(world.grid.occupied(), painted);
    // Everything rests on something: nothing can fall any further.
    for (x, y, c) in world.grid.iter() {
        if c != EMPTY {
            assert!(!world.grid.probe(x, y + 1).is_empty(), "({x},{y}) floating");
        }
    }

    world.set_draining(true);
    for _ in 0..2000 {
        world.tick();
    }
    assert_eq!(world.grid.occupied(), 0);
}

#[test]
fn star_brush_paints_and_erases() {
    let mut world = World::new(40, Brush::new(8.0, Shape::star()), 5);
    let painted = world.paint_at((20, 20), BrushMode::Paint);
    assert!(painted > 0);
    assert_eq!(world.grid.occupied(), painted);

    world.brush.shape = Shape::Disc;
    world.brush.adjust_radius(20.0);
    world.paint_at((20, 20), BrushMode::Erase);
    assert_eq!(world.grid.occupied(), 0);
}
