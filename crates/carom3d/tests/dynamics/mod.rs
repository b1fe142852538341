mod debug_draw;
mod constraints;
mod free_fall;
mod sleeping;
mod sub_steps;
mod vehicle;
