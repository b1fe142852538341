mod ball_ball_gjk;
mod convex_cast;
mod persistent_manifold;
mod ray_cast;
mod voronoi_simplex;
