use std::fmt;

use anyhow::anyhow;

use crate::metrics::string_width;
use crate::render::{
  Canvas,
  Font,
  POINTS_PER_INCH,
  Rect,
  Rgb,
  TextRun,
  centered_baseline
};

/// ISO A6 in points (105mm x 148mm).
pub const A6: (f64, f64) = (
  105.0 / 25.4 * POINTS_PER_INCH,
  148.0 / 25.4 * POINTS_PER_INCH
);

pub const GRID_MARGIN: f64 =
  0.5 * POINTS_PER_INCH;

/// Largest accepted grid; A6 cells are
/// barely two points wide at this size.
pub const MAX_GRID_SIZE: u32 = 100;

const BORDER_WIDTH: f64 = 1.0;

/// Largest square cell that fits an
/// `n` column, `n + 1` row block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackedGrid {
  pub cell:         f64,
  pub block_width:  f64,
  pub block_height: f64,
  pub offset_x:     f64,
  pub offset_y:     f64
}

#[tracing::instrument]
pub fn pack_grid(
  width: f64,
  height: f64,
  n: u32
) -> anyhow::Result<PackedGrid> {
  if n == 0 {
    return Err(anyhow!(
      "grid size must be at least 1"
    ));
  }
  if n > MAX_GRID_SIZE {
    return Err(anyhow!(
      "grid size {n} exceeds \
       {MAX_GRID_SIZE}"
    ));
  }
  if !(width.is_finite()
    && height.is_finite()
    && width > 0.0
    && height > 0.0)
  {
    return Err(anyhow!(
      "printable area must be \
       positive, got {width} x \
       {height}"
    ));
  }

  let cols = f64::from(n);
  let rows = cols + 1.0;

  let by_width = width / cols;
  let cell = if rows * by_width <= height
  {
    by_width
  } else {
    height / rows
  };

  let block_width = cols * cell;
  let block_height = rows * cell;

  let packed = PackedGrid {
    cell,
    block_width,
    block_height,
    offset_x: (width - block_width)
      / 2.0,
    offset_y: (height - block_height)
      / 2.0
  };
  tracing::debug!(?packed, "packed grid");
  Ok(packed)
}

/// Running totals of `step`, one per
/// cell in row-major order.
#[must_use]
pub fn number_cells(
  n: u32,
  step: f64
) -> Vec<f64> {
  let count = n as usize * n as usize;
  let mut total = 0.0;
  (0..count)
    .map(|_| {
      total += step;
      total
    })
    .collect()
}

#[must_use]
pub fn format_label(value: f64) -> String {
  format!("{value:.1}")
}

/// Page geometry for one hour grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
  pub page_width:  f64,
  pub page_height: f64,
  pub margin:      f64,
  pub n:           u32,
  pub packed:      PackedGrid,
  /// Left edge of the block.
  pub origin_x:    f64,
  /// Top edge of the header row.
  pub top_y:       f64,
  pub header_font: f64,
  pub cell_font:   f64
}

impl GridLayout {
  pub fn a6(n: u32) -> anyhow::Result<Self> {
    Self::new(A6.0, A6.1, GRID_MARGIN, n)
  }

  pub fn new(
    page_width: f64,
    page_height: f64,
    margin: f64,
    n: u32
  ) -> anyhow::Result<Self> {
    let area_width =
      page_width - 2.0 * margin;
    let area_height =
      page_height - 2.0 * margin;
    let packed =
      pack_grid(area_width, area_height, n)?;

    Ok(Self {
      page_width,
      page_height,
      margin,
      n,
      packed,
      origin_x: margin + packed.offset_x,
      top_y: page_height
        - margin
        - packed.offset_y,
      header_font: (packed.cell * 0.35)
        .clamp(5.0, 10.0),
      cell_font: (packed.cell * 0.3)
        .clamp(4.0, 7.0)
    })
  }

  #[must_use]
  pub fn header_rect(&self) -> Rect {
    Rect::new(
      self.origin_x,
      self.top_y - self.packed.cell,
      self.packed.block_width,
      self.packed.cell
    )
  }

  #[must_use]
  pub fn cell_rect(
    &self,
    row: u32,
    col: u32
  ) -> Rect {
    let cell = self.packed.cell;
    let data_top = self.top_y - cell;
    Rect::new(
      self.origin_x + f64::from(col) * cell,
      data_top - f64::from(row + 1) * cell,
      cell,
      cell
    )
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
  pub row:   u32,
  pub col:   u32,
  pub label: f64,
  pub rect:  Rect
}

#[must_use]
pub fn grid_cells(
  layout: &GridLayout,
  step: f64
) -> Vec<GridCell> {
  let n = layout.n;
  number_cells(n, step)
    .into_iter()
    .enumerate()
    .map(|(idx, label)| {
      let row = (idx / n as usize) as u32;
      let col = (idx % n as usize) as u32;
      GridCell {
        row,
        col,
        label,
        rect: layout.cell_rect(row, col)
      }
    })
    .collect()
}

/// Draws the header row and the
/// numbered cells. Returns the cells
/// that were drawn.
#[tracing::instrument(skip(layout, canvas))]
pub fn render_hour_grid<C: Canvas>(
  heading: &str,
  layout: &GridLayout,
  step: f64,
  canvas: &mut C
) -> Vec<GridCell> {
  let header = layout.header_rect();
  canvas.stroke_rect(
    header,
    Rgb::BLACK,
    BORDER_WIDTH
  );

  let size = layout.header_font;
  let text_width = string_width(
    heading,
    Font::HelveticaBold,
    size
  );
  let baseline = centered_baseline(
    header.y,
    header.height,
    size,
    0.15
  )
  .max(header.y + 2.0);
  canvas.draw_text(TextRun {
    text: heading.to_string(),
    font: Font::HelveticaBold,
    size,
    color: Rgb::BLACK,
    x: header.x
      + (header.width - text_width) / 2.0,
    y: baseline
  });

  let cells = grid_cells(layout, step);
  let size = layout.cell_font;
  for cell in &cells {
    canvas.stroke_rect(
      cell.rect,
      Rgb::BLACK,
      BORDER_WIDTH
    );

    let text = format_label(cell.label);
    let text_width = string_width(
      &text,
      Font::Helvetica,
      size
    );
    let baseline = centered_baseline(
      cell.rect.y,
      cell.rect.height,
      size,
      0.1
    )
    .max(cell.rect.y + 1.0);
    canvas.draw_text(TextRun {
      text,
      font: Font::Helvetica,
      size,
      color: Rgb::BLACK,
      x: cell.rect.x
        + (cell.rect.width - text_width)
          / 2.0,
      y: baseline
    });
  }

  tracing::debug!(
    cells = cells.len(),
    "rendered hour grid"
  );
  cells
}

/// Human-readable report printed after
/// a grid is written.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSummary {
  pub file_name:   String,
  pub heading:     String,
  pub page_width:  f64,
  pub page_height: f64,
  pub n:           u32,
  pub cell:        f64,
  pub cells:       usize,
  pub step:        f64,
  pub header_font: f64,
  pub cell_font:   f64
}

impl GridSummary {
  #[must_use]
  pub fn new(
    file_name: &str,
    heading: &str,
    layout: &GridLayout,
    cells: usize,
    step: f64
  ) -> Self {
    Self {
      file_name: file_name.to_string(),
      heading: heading.to_string(),
      page_width: layout.page_width,
      page_height: layout.page_height,
      n: layout.n,
      cell: layout.packed.cell,
      cells,
      step,
      header_font: layout.header_font,
      cell_font: layout.cell_font
    }
  }

  #[must_use]
  pub fn total(&self) -> f64 {
    self.cells as f64 * self.step
  }
}

impl fmt::Display for GridSummary {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    writeln!(
      f,
      "PDF '{}' (A6 size) created \
       successfully.",
      self.file_name
    )?;
    writeln!(
      f,
      "Page Size: A6 ({:.2}pt x \
       {:.2}pt approx. {:.1}in x \
       {:.1}in)",
      self.page_width,
      self.page_height,
      self.page_width / POINTS_PER_INCH,
      self.page_height / POINTS_PER_INCH
    )?;
    writeln!(
      f,
      "Header Text: '{}'",
      self.heading
    )?;
    writeln!(
      f,
      "Data grid dimensions: {} rows x \
       {} cols.",
      self.n, self.n
    )?;
    writeln!(
      f,
      "Cell size (for data and \
       header): {:.2}pt width x \
       {:.2}pt height.",
      self.cell, self.cell
    )?;
    writeln!(
      f,
      "Cells numbered: {} \
       (representing {:.1}hrs at \
       {}hr/cell).",
      self.cells,
      self.total(),
      self.step
    )?;
    write!(
      f,
      "Header font: ~{:.1}pt, Cell \
       font: ~{:.1}pt.",
      self.header_font, self.cell_font
    )
  }
}
