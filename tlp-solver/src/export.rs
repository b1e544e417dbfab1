use crate::index::VarId;
use crate::program::{LinearProgram, Sense};
use std::io::Write;

const OBJECTIVE: &str = "cost";

impl LinearProgram {
    /// Export the program to free `.mps` format.
    pub fn write_mps(&self, buffer: &mut impl Write) -> Result<(), std::io::Error> {
        // MPS is a somewhat archaic format, but is easy enough to generate.
        // https://www.ibm.com/docs/en/icos/22.1.2?topic=standard-records-in-mps-format
        // is a good reference.
        writeln!(buffer, "NAME trade_lp")?;
        writeln!(buffer, "ROWS")?;
        writeln!(buffer, " N    {OBJECTIVE}")?;
        for row in self.rows() {
            let kind = match row.sense {
                Sense::Le => "L",
                Sense::Ge => "G",
                Sense::Eq => "E",
            };
            writeln!(buffer, " {kind}    {}", row.name)?;
        }

        // Columns are listed variable by variable, so transpose the rows first
        let mut columns = vec![Vec::new(); self.num_variables()];
        for row in self.rows() {
            for &(var, coefficient) in row.terms.iter() {
                columns[var.index()].push((row.name.as_str(), coefficient));
            }
        }

        writeln!(buffer, "COLUMNS")?;
        for (var, entries) in self.variables().iter().zip(columns) {
            if var.cost != 0.0 {
                writeln!(buffer, "    {}    {OBJECTIVE}    {}", var.name, var.cost)?;
            }
            for (row, coefficient) in entries {
                writeln!(buffer, "    {}    {row}    {coefficient}", var.name)?;
            }
        }

        writeln!(buffer, "RHS")?;
        for row in self.rows() {
            if row.rhs != 0.0 {
                writeln!(buffer, "    rhs    {}    {}", row.name, row.rhs)?;
            }
        }

        // Every variable is non-negative, which is the MPS default, so BOUNDS is omitted
        writeln!(buffer, "ENDATA")?;
        Ok(())
    }

    /// Export the program to CPLEX `.lp` format.
    pub fn write_lp(&self, buffer: &mut impl Write) -> Result<(), std::io::Error> {
        writeln!(buffer, "\\ trade_lp")?;
        writeln!(buffer, "Minimize")?;
        write!(buffer, " {OBJECTIVE}:")?;
        let objective = self
            .variables()
            .iter()
            .enumerate()
            .filter(|(_, var)| var.cost != 0.0)
            .map(|(idx, var)| (VarId::from(idx), var.cost))
            .collect::<Vec<_>>();
        self.write_terms(buffer, &objective)?;
        writeln!(buffer)?;

        writeln!(buffer, "Subject To")?;
        for row in self.rows() {
            write!(buffer, " {}:", row.name)?;
            self.write_terms(buffer, &row.terms)?;
            writeln!(buffer, " {} {}", row.sense, row.rhs)?;
        }

        // Every variable is non-negative, which is the LP default, so Bounds is omitted
        writeln!(buffer, "End")?;
        Ok(())
    }

    fn write_terms(
        &self,
        buffer: &mut impl Write,
        terms: &[(VarId, f64)],
    ) -> Result<(), std::io::Error> {
        // An expression needs at least one term
        if terms.is_empty() {
            if let Some(first) = self.variables().first() {
                write!(buffer, " 0 {}", first.name)?;
            }
            return Ok(());
        }
        for &(var, coefficient) in terms {
            let sign = if coefficient < 0.0 { '-' } else { '+' };
            write!(
                buffer,
                " {sign} {} {}",
                coefficient.abs(),
                self.variables()[var.index()].name
            )?;
        }
        Ok(())
    }
}
