use forest_iter::{iterate_2d, CornerInfo, Connectivity, FaceInfo, Forest, GhostLayer, VolumeInfo};
use morton::{len_at, Dim2, Quadrant};

fn main() {
    // Two trees glued along tree 0's +x face to tree 1's -x face. Tree 0
    // is refined once; tree 1 stays a single root quadrant, so the glued
    // face hangs.
    let half = len_at(1);
    let mut tree0 = vec![
        Quadrant::<Dim2>::new_2d(0, 0, 1),
        Quadrant::new_2d(half, 0, 1),
        Quadrant::new_2d(0, half, 1),
        Quadrant::new_2d(half, half, 1),
    ];
    tree0.sort();
    let tree1 = vec![Quadrant::<Dim2>::new_2d(0, 0, 0)];

    let forest = Forest::new(vec![tree0, tree1]);
    let ghost = GhostLayer::empty(2);
    let mut connectivity = Connectivity::<Dim2>::unconnected(2);
    connectivity.connect_faces(0, 1, 1, 0, 0);

    iterate_2d(
        &forest,
        &ghost,
        &connectivity,
        Some(|info: VolumeInfo<Dim2>| {
            println!("volume: tree {} local {}", info.tree_id, info.tree_local_num);
        }),
        Some(|info: FaceInfo<Dim2>| {
            if info.flags.is_outside_face() {
                return;
            }
            let kind = if info.flags.is_hanging() { "hanging" } else { "conforming" };
            println!(
                "{kind} face: tree {} face {} <-> tree {} face {}",
                info.left.tree_id, info.left.outgoing_face, info.right.tree_id, info.right.outgoing_face
            );
        }),
        Some(|info: CornerInfo<Dim2>| {
            let participants = info.sides.iter().filter(|s| s.quad.is_some()).count();
            if participants > 1 {
                println!("shared corner: {participants} participants");
            }
        }),
    );
}
