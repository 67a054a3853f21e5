mod moods;
mod tasks;
